//! `POST /api/brevo/test-email`: delivery self-test

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use verdant_core::TestEmailError;

use super::{invalid_body, require_email};
use crate::context::AppContext;
use crate::utils::{execute_logged, ApiFailure, ApiSuccess};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEmailBody {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
}

pub async fn test_email(
    State(ctx): State<AppContext>,
    body: Result<Json<TestEmailBody>, JsonRejection>,
) -> Response {
    execute_logged("brevo::test_email", async move {
        let Json(body) = body.map_err(invalid_body)?;
        let email = require_email(body.email, "Email is required")?;

        match ctx.lead_capture.send_test_email(&email, body.first_name.as_deref()).await {
            Ok(sent) => Ok(ApiSuccess::new("Test email sent successfully", sent).into_response()),
            Err(TestEmailError::ConnectionFailed(message)) => {
                Err(ApiFailure::internal("API connection failed", message))
            }
            Err(TestEmailError::Provider(err)) => {
                Err(ApiFailure::provider("Failed to send test email", &err, ctx.environment()))
            }
        }
    })
    .await
}
