//! Token-bucket rate limiting for outbound calls
//!
//! The bucket refills proportionally to elapsed time
//! (`floor(elapsed / interval * capacity)` whole tokens, capped at capacity).
//! [`TokenBucket::acquire`] waits at most once: when the bucket is short it
//! sleeps for the computed deficit, refills, and proceeds even if another
//! caller consumed tokens during the wait. In that case the bucket goes into
//! deficit (negative tokens) and later refills repay it first, so sustained
//! overload is smoothed out rather than rejected.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use super::{Clock, SystemClock};

/// Configuration for token bucket rate limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBucketConfig {
    /// Maximum number of tokens the bucket can hold
    pub capacity: u64,
    /// Time needed to refill an empty bucket completely
    pub interval: Duration,
}

impl Default for TokenBucketConfig {
    fn default() -> Self {
        Self { capacity: 100, interval: Duration::from_secs(3600) }
    }
}

impl TokenBucketConfig {
    /// Create a configuration from `tokens_per_interval` and an interval in
    /// milliseconds.
    pub fn per_interval_ms(tokens_per_interval: u64, interval_ms: u64) -> Self {
        Self { capacity: tokens_per_interval, interval: Duration::from_millis(interval_ms) }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("capacity must be greater than 0".to_string());
        }
        if i64::try_from(self.capacity).is_err() {
            return Err("capacity is too large".to_string());
        }
        if self.interval.is_zero() {
            return Err("interval must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Time it takes to earn a single token.
    pub fn time_per_token(&self) -> Duration {
        self.wait_for(1)
    }

    fn wait_for(&self, deficit: u64) -> Duration {
        let nanos = self.interval.as_nanos().saturating_mul(u128::from(deficit))
            / u128::from(self.capacity.max(1));
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

#[derive(Debug)]
struct BucketState {
    tokens: i64,
    last_refill: Instant,
}

/// Token bucket rate limiter
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
///
/// use verdant_common::resilience::{TokenBucket, TokenBucketConfig};
///
/// # async fn example() -> Result<(), String> {
/// let limiter = TokenBucket::new(TokenBucketConfig::per_interval_ms(10, 1_000))?;
///
/// // Waits only when the bucket is empty.
/// let waited: Duration = limiter.acquire(1).await;
/// assert!(waited.is_zero());
/// # Ok(())
/// # }
/// ```
pub struct TokenBucket<C: Clock = SystemClock> {
    config: TokenBucketConfig,
    state: Arc<Mutex<BucketState>>,
    clock: Arc<C>,
}

impl<C: Clock> TokenBucket<C> {
    /// Create a new token bucket with custom clock
    pub fn with_clock(config: TokenBucketConfig, clock: C) -> Result<Self, String> {
        config.validate()?;
        let tokens = i64::try_from(config.capacity).map_err(|e| e.to_string())?;

        Ok(Self {
            state: Arc::new(Mutex::new(BucketState { tokens, last_refill: clock.now() })),
            clock: Arc::new(clock),
            config,
        })
    }

    /// Bucket configuration.
    pub fn config(&self) -> TokenBucketConfig {
        self.config
    }

    fn capacity(&self) -> i64 {
        i64::try_from(self.config.capacity).unwrap_or(i64::MAX)
    }

    /// Refill tokens based on elapsed time
    fn refill(&self, state: &mut BucketState) {
        let now = self.clock.now();
        let elapsed = now.saturating_duration_since(state.last_refill);

        let earned = elapsed.as_nanos().saturating_mul(u128::from(self.config.capacity))
            / self.config.interval.as_nanos().max(1);
        let earned = i64::try_from(earned).unwrap_or(i64::MAX);

        if earned > 0 {
            state.tokens = state.tokens.saturating_add(earned).min(self.capacity());
            state.last_refill = now;
            debug!(earned, tokens = state.tokens, "token bucket refilled");
        }
    }

    /// Take `count` tokens if they are available right now.
    ///
    /// Returns the time the caller would have to wait otherwise.
    pub fn try_acquire(&self, count: u64) -> Result<(), Duration> {
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        let mut state = self.state.lock();
        self.refill(&mut state);

        if state.tokens >= count {
            state.tokens -= count;
            return Ok(());
        }

        let deficit = u64::try_from(count - state.tokens.max(0)).unwrap_or(u64::MAX);
        Err(self.config.wait_for(deficit))
    }

    /// Take `count` tokens, waiting once for the computed deficit if needed.
    ///
    /// Returns how long the caller was suspended.
    pub async fn acquire(&self, count: u64) -> Duration {
        let wait = match self.try_acquire(count) {
            Ok(()) => return Duration::ZERO,
            Err(wait) => wait,
        };

        debug!(count, wait_ms = wait.as_millis() as u64, "rate limit reached, waiting for tokens");
        self.clock.sleep(wait).await;

        let count = i64::try_from(count).unwrap_or(i64::MAX);
        let mut state = self.state.lock();
        self.refill(&mut state);
        state.tokens = state.tokens.saturating_sub(count);
        wait
    }

    /// Get the current number of available tokens (negative while in deficit)
    pub fn available_tokens(&self) -> i64 {
        let mut state = self.state.lock();
        self.refill(&mut state);
        state.tokens
    }

    /// Reset the limiter to full capacity
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.tokens = self.capacity();
        state.last_refill = self.clock.now();
    }
}

impl TokenBucket<SystemClock> {
    /// Create a new token bucket with system clock
    pub fn new(config: TokenBucketConfig) -> Result<Self, String> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Clone for TokenBucket<C> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C: Clock> std::fmt::Debug for TokenBucket<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBucket")
            .field("config", &self.config)
            .field("tokens", &self.state.lock().tokens)
            .finish_non_exhaustive()
    }
}
