//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::constants::{DOCUMENT_NOT_FOUND_CODE, DUPLICATE_PARAMETER_CODE};

/// Parsed error body returned by the provider on a non-2xx response.
///
/// The provider answers with `{"code": "...", "message": "..."}`; both fields
/// are optional here because proxies and gateways in front of it do not always
/// follow that shape. The untouched payload is kept in `raw` for debugging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub raw: Value,
}

impl ProviderErrorBody {
    /// Build from an already-parsed JSON payload.
    pub fn from_json(raw: Value) -> Self {
        let field = |name: &str| raw.get(name).and_then(Value::as_str).map(str::to_owned);
        Self { code: field("code"), message: field("message"), raw }
    }

    /// Build from a raw response body, falling back to a JSON string when the
    /// body is not JSON.
    pub fn from_text(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<Value>(text) {
            Ok(json) => Self::from_json(json),
            Err(_) => Self { raw: Value::String(text.to_owned()), ..Self::default() },
        }
    }

    /// Provider message or `Unknown error`.
    pub fn display_message(&self) -> &str {
        self.message.as_deref().unwrap_or("Unknown error")
    }
}

/// Failure of a single call to the email-marketing provider.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ProviderError {
    /// The provider answered with a non-2xx status.
    #[error("Brevo API Error: {status} - {}", .body.display_message())]
    Api { status: u16, body: ProviderErrorBody },

    /// No response was received (DNS, connection, timeout).
    #[error("Network error: {message}")]
    Transport { message: String, timed_out: bool },

    /// A 2xx response whose body did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The client could not be built from its configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProviderError {
    /// Shorthand for an API error built from a raw response body.
    pub fn api(status: u16, body: &str) -> Self {
        Self::Api { status, body: ProviderErrorBody::from_text(body) }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into(), timed_out: false }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into(), timed_out: true }
    }

    /// HTTP status, for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed error body, for API errors.
    pub fn body(&self) -> Option<&ProviderErrorBody> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Provider-specific error code, for API errors.
    pub fn code(&self) -> Option<&str> {
        self.body().and_then(|body| body.code.as_deref())
    }

    /// The resource being created already exists.
    pub fn is_duplicate(&self) -> bool {
        self.code() == Some(DUPLICATE_PARAMETER_CODE)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404) || self.code() == Some(DOCUMENT_NOT_FOUND_CODE)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { timed_out: true, .. })
    }

    /// Transport failures, throttling and 5xx responses may succeed on a later
    /// attempt. Other 4xx responses never do.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Decode(_) | Self::Config(_) => false,
        }
    }
}

/// Main error type for Verdant
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum VerdantError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl VerdantError {
    /// The provider error underneath, if any.
    pub fn as_provider(&self) -> Option<&ProviderError> {
        match self {
            Self::Provider(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for Verdant operations
pub type Result<T> = std::result::Result<T, VerdantError>;
