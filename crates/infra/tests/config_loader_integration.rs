//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use tempfile::NamedTempFile;
use verdant_domain::{Environment, VerdantError};
use verdant_infra::config;

fn temp_config(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_full_config_from_toml_file() {
    let path = temp_config(
        r#"
environment = "test"

[provider]
api_key = "xkeysib-integration"
base_url = "https://api.brevo.com/v3"
timeout_secs = 15
max_attempts = 4
retry_backoff_ms = 100

[rate_limits.general]
tokens_per_interval = 100
interval_ms = 3600000

[rate_limits.contacts]
tokens_per_interval = 36000
interval_ms = 3600000

[rate_limits.transactional]
tokens_per_interval = 3600000
interval_ms = 3600000

[server]
bind_addr = "0.0.0.0:3100"

[sender]
name = "Support"
campaign_name = "Newsletter"
email = "support@example.com"

[setup]
folder_pacing_ms = 0
list_pacing_ms = 0
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("Failed to load config from TOML file");
    std::fs::remove_file(path).ok();

    assert_eq!(config.environment, Environment::Test);
    assert_eq!(config.provider.timeout_secs, 15);
    assert_eq!(config.provider.max_attempts, 4);
    assert_eq!(config.server.bind_addr, "0.0.0.0:3100");
    assert_eq!(config.sender.campaign().name, "Newsletter");
    assert_eq!(config.setup.folder_pacing_ms, 0);
    assert!(config::validate(&config).is_ok());
}

#[test]
fn test_load_config_with_minimal_fields() {
    let path = temp_config(r#"{"provider": {"api_key": "minimal"}}"#, "json");

    let config = config::load_from_file(Some(path.clone())).expect("Failed to load config with minimal fields");
    std::fs::remove_file(path).ok();

    assert_eq!(config.rate_limits.general.tokens_per_interval, 100);
    assert_eq!(config.setup.list_pacing_ms, 300);
    assert_eq!(config.site_url(), "http://localhost:3000");
    assert_eq!(config.taxonomy()[0].name, "Lead Magnets");
}

#[test]
fn test_load_config_from_nonexistent_file() {
    let result = config::load_from_file(Some("/nonexistent/path/verdant.json".into()));

    match result {
        Err(VerdantError::Config(msg)) => {
            assert!(msg.contains("not found"), "Error message should mention 'not found'");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn test_load_config_with_invalid_format() {
    let path = temp_config(r#"{ "this is": "not valid" "#, "json");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(path).ok();

    match result {
        Err(VerdantError::Config(msg)) => {
            assert!(msg.contains("Invalid JSON"), "Error message should mention invalid JSON");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn test_zero_quota_fails_validation() {
    let path = temp_config(
        r#"
[provider]
api_key = "k"

[rate_limits.contacts]
tokens_per_interval = 0
interval_ms = 1000
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("file parses");
    std::fs::remove_file(path).ok();

    assert!(matches!(config::validate(&config), Err(VerdantError::Config(_))));
}
