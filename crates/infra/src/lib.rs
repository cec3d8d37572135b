//! # Verdant Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - HTTP client with timeout and bounded retry
//! - The Brevo REST adapter (`BrevoClient`) with per-class rate limiting
//! - Configuration loading (environment, `.env`, TOML/JSON files)
//!
//! ## Architecture
//! - Implements traits defined in `verdant-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod brevo;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use brevo::{BrevoClient, RateLimiters};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder, RetryPolicy};
