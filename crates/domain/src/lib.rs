//! # Verdant Domain
//!
//! Email-marketing domain types for Verdant.
//!
//! This crate contains:
//! - The provider data model (contacts, lists, folders, campaigns, segments,
//!   automations, transactional email, account)
//! - Normalized `Outcome` records returned by orchestration helpers
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants (quotas, attribute names, default taxonomy)
//!
//! ## Architecture
//! - No dependencies on other Verdant crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
