//! JSON response shapes shared by the handlers

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use verdant_domain::{Environment, ProviderError};

/// `{success, message, data?, warning?}` body of a 200 response
#[derive(Debug, Clone, Serialize)]
pub struct ApiSuccess<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub data: T,
}

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self { success: true, message: Some(message.into()), warning: None, data }
    }

    /// Success without a human-readable message.
    pub fn data(data: T) -> Self {
        Self { success: true, message: None, warning: None, data }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct FailureBody {
    success: bool,
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Error response: a status code and `{success: false, error, message, details?}`
#[derive(Debug, Clone, PartialEq)]
pub struct ApiFailure {
    status: StatusCode,
    body: FailureBody,
}

impl ApiFailure {
    pub fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: FailureBody {
                success: false,
                error: error.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn bad_request(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, message)
    }

    pub fn internal(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error, message)
    }

    /// 405 for a route called with the wrong verb.
    pub fn method_not_allowed(allowed: &str) -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed",
            format!("This endpoint only accepts {allowed} requests"),
        )
    }

    /// 500 for a provider failure. The raw provider body is attached outside
    /// production only.
    pub fn provider(error: impl Into<String>, err: &ProviderError, environment: Environment) -> Self {
        let failure = Self::internal(error, err.to_string());
        if environment.is_production() {
            return failure;
        }
        match err.body() {
            Some(body) => failure.with_details(body.raw.clone()),
            None => failure,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.body.details = Some(details);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.body.message
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn provider_failure_carries_raw_body_outside_production() {
        let err = ProviderError::api(400, r#"{"code":"invalid_parameter","message":"bad"}"#);

        let failure = ApiFailure::provider("Failed to add contact", &err, Environment::Development);

        assert_eq!(failure.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            failure.body.details,
            Some(json!({"code": "invalid_parameter", "message": "bad"}))
        );
        assert_eq!(failure.message(), "Brevo API Error: 400 - bad");
    }

    #[test]
    fn provider_failure_hides_details_in_production() {
        let err = ProviderError::api(500, r#"{"message":"boom"}"#);

        let failure = ApiFailure::provider("Failed to add contact", &err, Environment::Production);

        assert_eq!(failure.body.details, None);
    }

    #[test]
    fn transport_failure_has_no_details() {
        let err = ProviderError::timeout("HTTP request timed out");

        let failure = ApiFailure::provider("Failed to add contact", &err, Environment::Development);

        assert_eq!(failure.body.details, None);
        assert!(failure.message().contains("timed out"));
    }

    #[test]
    fn method_not_allowed_names_the_verb() {
        let failure = ApiFailure::method_not_allowed("GET");
        assert_eq!(failure.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(failure.message(), "This endpoint only accepts GET requests");
    }
}
