//! Folder/list taxonomy endpoints

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

use crate::context::AppContext;
use crate::utils::{execute_logged, ApiFailure, ApiSuccess};

/// `GET /api/brevo/check-organization`
pub async fn check_organization(State(ctx): State<AppContext>) -> Response {
    execute_logged("brevo::check_organization", async move {
        let report = ctx.organization.check_organization().await.map_err(|err| {
            ApiFailure::provider("Failed to check organization", &err, ctx.environment())
        })?;
        info!(
            folders = report.summary.total_folders,
            lists = report.summary.total_lists,
            without_folder = report.summary.lists_without_folder,
            "organization checked"
        );
        Ok(ApiSuccess::data(report).into_response())
    })
    .await
}

/// `POST /api/brevo/setup-organization`
///
/// Per-item failures are listed in the report; the request itself succeeds.
pub async fn setup_organization(State(ctx): State<AppContext>) -> Response {
    execute_logged("brevo::setup_organization", async move {
        let report = ctx.organization.setup_organization(&ctx.taxonomy()).await;
        if !report.failures.is_empty() {
            warn!(failures = report.failures.len(), "organization setup finished with failures");
        }
        Ok(ApiSuccess::new("Brevo organization setup completed", report).into_response())
    })
    .await
}
