//! # Verdant API
//!
//! HTTP layer - request handlers and application wiring.
//!
//! This crate contains:
//! - axum handlers for the `/api/brevo/*` endpoints
//! - Application context (dependency injection)
//! - Logging set-up and response shapes
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod utils;

use axum::routing::{get, post};
use axum::Router;

pub use commands::{add_contact, check_organization, setup_organization, test_email};
pub use context::AppContext;

/// Routes for every endpoint, each restricted to its single method.
pub fn router(context: AppContext) -> Router {
    Router::new()
        .route("/api/brevo/add-contact", post(add_contact).fallback(commands::post_only))
        .route(
            "/api/brevo/check-organization",
            get(check_organization).fallback(commands::get_only),
        )
        .route(
            "/api/brevo/setup-organization",
            post(setup_organization).fallback(commands::post_only),
        )
        .route("/api/brevo/test-email", post(test_email).fallback(commands::post_only))
        .with_state(context)
}
