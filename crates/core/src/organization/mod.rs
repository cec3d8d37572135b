//! Account organization

pub mod service;

pub use service::{OrganizationService, Pacing};
