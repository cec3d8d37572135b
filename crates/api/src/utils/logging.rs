use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Selects the JSON formatter when set to `json`.
pub const LOG_FORMAT_ENV: &str = "VERDANT_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Install the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` and defaults to `info`. Fails if a global
/// subscriber is already installed.
pub fn init_tracing() -> Result<(), InitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}

/// Log the outcome of a handler execution with structured fields.
///
/// # Parameters
/// * `command` - Logical handler identifier (e.g. `"brevo::add_contact"`).
/// * `elapsed` - Duration the handler took.
/// * `success` - Whether the handler answered with a success response.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}
