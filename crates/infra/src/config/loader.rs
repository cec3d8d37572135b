//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the process environment, if present
//! 2. Attempts to load from environment variables
//! 3. If the API key is not in the environment, falls back to a config file
//! 4. Probes multiple paths for config files (JSON and TOML)
//! 5. Validates the result
//!
//! ## Environment Variables
//! - `BREVO_API_KEY`: provider API key (required for environment loading)
//! - `VERDANT_ENV`: `production`, `development` or `test`
//! - `VERDANT_BIND_ADDR`: HTTP listen address
//! - `VERDANT_PROVIDER_BASE_URL`: provider API root
//! - `VERDANT_HTTP_TIMEOUT_SECS`: per-request timeout in seconds
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./verdant.toml`, `./verdant.json`, `./config.toml`, `./config.json`
//! 2. The same names in the parent and grandparent directories
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};

use url::Url;
use verdant_domain::{Config, Environment, Result, VerdantError};

const API_KEY_VAR: &str = "BREVO_API_KEY";
const ENVIRONMENT_VAR: &str = "VERDANT_ENV";
const BIND_ADDR_VAR: &str = "VERDANT_BIND_ADDR";
const BASE_URL_VAR: &str = "VERDANT_PROVIDER_BASE_URL";
const TIMEOUT_VAR: &str = "VERDANT_HTTP_TIMEOUT_SECS";

const CONFIG_FILE_NAMES: [&str; 4] = ["verdant.toml", "verdant.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `VerdantError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)?
        }
    };

    validate(&config)?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// Only the API key is required; everything else falls back to defaults.
///
/// # Errors
/// Returns `VerdantError::Config` if the API key is missing or a variable has
/// an invalid value.
pub fn load_from_env() -> Result<Config> {
    from_vars(|key| std::env::var(key).ok())
}

/// Build a configuration from a variable lookup.
fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Config> {
    let api_key = get(API_KEY_VAR)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| VerdantError::Config(format!("Missing required environment variable: {API_KEY_VAR}")))?;

    let mut config = Config::default();
    config.provider.api_key = api_key;
    apply_overrides(&mut config, get)?;
    Ok(config)
}

/// Apply the optional variables on top of `config`.
fn apply_overrides(config: &mut Config, get: impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(value) = get(ENVIRONMENT_VAR) {
        config.environment = value
            .parse::<Environment>()
            .map_err(|e| VerdantError::Config(format!("Invalid {ENVIRONMENT_VAR}: {e}")))?;
    }
    if let Some(value) = get(BIND_ADDR_VAR) {
        config.server.bind_addr = value;
    }
    if let Some(value) = get(BASE_URL_VAR) {
        config.provider.base_url = value;
    }
    if let Some(value) = get(TIMEOUT_VAR) {
        config.provider.timeout_secs = value
            .parse::<u64>()
            .map_err(|e| VerdantError::Config(format!("Invalid {TIMEOUT_VAR}: {e}")))?;
    }
    Ok(())
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
/// Environment variables override file values, so a key kept out of the file
/// can still come from the environment.
///
/// # Errors
/// Returns `VerdantError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(VerdantError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            VerdantError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| VerdantError::Config(format!("Failed to read config file: {e}")))?;

    let mut config = parse_config(&contents, &config_path)?;
    if let Some(key) = std::env::var(API_KEY_VAR).ok().filter(|v| !v.trim().is_empty()) {
        config.provider.api_key = key;
    }
    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| VerdantError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| VerdantError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(VerdantError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Validate a loaded configuration, including URL syntax.
///
/// # Errors
/// Returns `VerdantError::Config` naming the first invalid setting.
pub fn validate(config: &Config) -> Result<()> {
    config.validate()?;

    for (name, value) in [
        ("provider.base_url", &config.provider.base_url),
        ("site.production_url", &config.site.production_url),
        ("site.development_url", &config.site.development_url),
    ] {
        Url::parse(value).map_err(|e| VerdantError::Config(format!("Invalid {name} '{value}': {e}")))?;
    }
    Ok(())
}
