//! `POST /api/brevo/add-contact`: lead capture from signup forms

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use verdant_core::{CapturedLead, EmailDelivery, LeadCaptureOutcome, LeadCaptureRequest};

use super::{invalid_body, require_email};
use crate::context::AppContext;
use crate::utils::{execute_logged, ApiFailure, ApiSuccess};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddContactBody {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub list_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCaptured {
    pub contact_id: Option<i64>,
    pub list_id: i64,
    pub list_name: String,
    pub email_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactExists {
    pub contact_exists: bool,
    pub email: String,
}

pub async fn add_contact(
    State(ctx): State<AppContext>,
    body: Result<Json<AddContactBody>, JsonRejection>,
) -> Response {
    execute_logged("brevo::add_contact", run(ctx, body)).await
}

async fn run(
    ctx: AppContext,
    body: Result<Json<AddContactBody>, JsonRejection>,
) -> Result<Response, ApiFailure> {
    let Json(body) = body.map_err(invalid_body)?;
    let email = require_email(body.email, "Email address is required")?;
    let request = LeadCaptureRequest {
        email,
        first_name: body.first_name,
        source: body.source,
        list_name: body.list_name,
    };

    match ctx.lead_capture.capture(&request).await {
        Ok(LeadCaptureOutcome::Captured(lead)) => Ok(captured(lead)),
        Ok(LeadCaptureOutcome::AlreadyExists { email }) => {
            info!(%email, "contact already exists");
            Ok(ApiSuccess::new(
                "Contact already exists in our system",
                ContactExists { contact_exists: true, email },
            )
            .into_response())
        }
        Err(err) => Err(ApiFailure::provider("Failed to add contact", &err, ctx.environment())),
    }
}

fn captured(lead: CapturedLead) -> Response {
    let mut data = ContactCaptured {
        contact_id: lead.contact_id,
        list_id: lead.list.id,
        list_name: lead.list.name,
        email_sent: false,
        message_id: None,
        email_error: None,
    };

    match lead.email {
        EmailDelivery::Sent { message_id } => {
            data.email_sent = true;
            data.message_id = message_id;
            ApiSuccess::new("Contact added and welcome email sent successfully", data)
                .into_response()
        }
        EmailDelivery::Failed { error } => {
            data.email_error = Some(error);
            ApiSuccess::new("Contact added successfully, but welcome email failed to send", data)
                .with_warning("Please manually follow up with this lead")
                .into_response()
        }
    }
}
