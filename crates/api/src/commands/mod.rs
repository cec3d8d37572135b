//! Request handlers for the `/api/brevo` endpoints

pub mod contacts;
pub mod organization;
pub mod test_email;

use axum::extract::rejection::JsonRejection;
use verdant_common::EmailValidator;

pub use contacts::add_contact;
pub use organization::{check_organization, setup_organization};
pub use test_email::test_email;

use crate::utils::ApiFailure;

/// Fallback for POST-only routes.
pub async fn post_only() -> ApiFailure {
    ApiFailure::method_not_allowed("POST")
}

/// Fallback for GET-only routes.
pub async fn get_only() -> ApiFailure {
    ApiFailure::method_not_allowed("GET")
}

pub(crate) fn invalid_body(rejection: JsonRejection) -> ApiFailure {
    ApiFailure::bad_request("Invalid request body", rejection.body_text())
}

/// Trimmed email, or a 400 when it is absent or malformed.
pub(crate) fn require_email(email: Option<String>, missing: &str) -> Result<String, ApiFailure> {
    let email = email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty());
    let Some(email) = email else {
        return Err(ApiFailure::bad_request("Missing required field", missing));
    };
    if !EmailValidator::new().is_valid(&email) {
        return Err(ApiFailure::bad_request(
            "Invalid email format",
            "Please provide a valid email address",
        ));
    }
    Ok(email)
}
