//! Brevo provider adapter

pub mod client;
pub mod rate_limits;

pub use client::BrevoClient;
pub use rate_limits::RateLimiters;
