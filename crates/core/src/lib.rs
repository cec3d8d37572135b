//! # Verdant Core
//!
//! Email-marketing orchestration - no infrastructure dependencies.
//!
//! This crate contains:
//! - The provider port (`EmailMarketingProvider`)
//! - Orchestration helpers and the lead-capture flow
//! - Organization (folder/list taxonomy) set-up
//! - HTML content builders for outbound email
//!
//! ## Architecture Principles
//! - Only depends on `verdant-common` and `verdant-domain`
//! - No HTTP or platform code
//! - The provider is injected as `Arc<dyn EmailMarketingProvider>`

pub mod content;
pub mod lead_capture;
pub mod marketing;
pub mod organization;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use lead_capture::{
    CapturedLead, EmailDelivery, LeadCaptureOutcome, LeadCaptureRequest, LeadCaptureService,
    TestEmailError, TestEmailSent,
};
pub use marketing::{EmailMarketingProvider, MarketingService, MarketingSettings, ProviderResult};
pub use organization::{OrganizationService, Pacing};
