//! Modular common utilities shared across Verdant crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: validation (email field validator)
//! - `runtime`: async infrastructure (token-bucket rate limiting, clocks)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod validation;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;

#[cfg(feature = "runtime")]
pub use resilience::{Clock, MockClock, SystemClock, TokenBucket, TokenBucketConfig};
#[cfg(feature = "foundation")]
pub use validation::{EmailValidator, FieldValidator};
