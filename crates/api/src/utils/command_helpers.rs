//! Handler execution helpers
//!
//! Times a handler, logs its outcome and turns its error into a response.

use std::future::Future;
use std::time::Instant;

use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::utils::logging::log_command_execution;
use crate::utils::response::ApiFailure;

/// Run a handler body with timing and outcome logging.
///
/// Server-side failures are logged at `error`; client mistakes (4xx) only
/// show up as a failed execution.
pub async fn execute_logged<Fut>(command_name: &str, command: Fut) -> Response
where
    Fut: Future<Output = Result<Response, ApiFailure>>,
{
    let start = Instant::now();
    let result = command.await;

    log_command_execution(command_name, start.elapsed(), result.is_ok());

    match result {
        Ok(response) => response,
        Err(failure) => {
            if failure.status().is_server_error() {
                error!(command = command_name, message = failure.message(), "command failed");
            }
            failure.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[tokio::test]
    async fn failure_becomes_its_response() {
        let response = execute_logged("test::failing", async {
            Err(ApiFailure::bad_request("Missing required field", "Email address is required"))
        })
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn success_passes_through() {
        let response =
            execute_logged("test::ok", async { Ok(StatusCode::ACCEPTED.into_response()) }).await;

        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }
}
