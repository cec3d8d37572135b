//! Normalized non-throwing results of orchestration helpers

use serde::{Deserialize, Serialize};

/// `{success, message, data?, error?}`
///
/// Helpers return this instead of an error for recoverable cases (not found,
/// provider rejection) so callers can display `message` directly. `error`
/// carries the original provider text when a call failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<T> {
    pub success: bool,
    pub message: String,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Outcome<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self { success: true, message: message.into(), data: Some(data), error: None }
    }

    /// Failure that did not come from a provider error (e.g. list not found).
    pub fn rejected(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), data: None, error: None }
    }

    /// Failure caused by `error`.
    pub fn failed(message: impl Into<String>, error: impl ToString) -> Self {
        Self { success: false, message: message.into(), data: None, error: Some(error.to_string()) }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}
