//! Resilience primitives for outbound calls
//!
//! - [`TokenBucket`]: proportional-refill token bucket that waits once for
//!   the computed deficit and then proceeds
//! - [`Clock`]: time abstraction so waiting can be tested without real delays

pub mod clock;
pub mod rate_limiter;

pub use clock::{Clock, MockClock, SystemClock};
pub use rate_limiter::{TokenBucket, TokenBucketConfig};
