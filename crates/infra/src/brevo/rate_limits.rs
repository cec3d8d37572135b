//! Per-class token buckets shared by every request of a client

use std::time::Duration;

use tracing::debug;
use verdant_common::{Clock, SystemClock, TokenBucket, TokenBucketConfig};
use verdant_domain::{ProviderError, RateLimitClass, RateLimitsConfig};

/// One token bucket per [`RateLimitClass`].
#[derive(Debug, Clone)]
pub struct RateLimiters<C: Clock = SystemClock> {
    general: TokenBucket<C>,
    contacts: TokenBucket<C>,
    transactional: TokenBucket<C>,
}

impl RateLimiters<SystemClock> {
    /// Buckets sized from the configured quotas, on the system clock.
    pub fn from_config(config: &RateLimitsConfig) -> Result<Self, ProviderError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock + Clone> RateLimiters<C> {
    /// Same as [`RateLimiters::from_config`] with an explicit clock.
    pub fn with_clock(config: &RateLimitsConfig, clock: C) -> Result<Self, ProviderError> {
        let bucket = |class: RateLimitClass| {
            let quota = config.for_class(class);
            TokenBucket::with_clock(
                TokenBucketConfig::per_interval_ms(quota.tokens_per_interval, quota.interval_ms),
                clock.clone(),
            )
            .map_err(|reason| ProviderError::Config(format!("{class} rate limit: {reason}")))
        };

        Ok(Self {
            general: bucket(RateLimitClass::General)?,
            contacts: bucket(RateLimitClass::Contacts)?,
            transactional: bucket(RateLimitClass::Transactional)?,
        })
    }
}

impl<C: Clock> RateLimiters<C> {
    /// Bucket charged for `class`.
    pub fn bucket(&self, class: RateLimitClass) -> &TokenBucket<C> {
        match class {
            RateLimitClass::General => &self.general,
            RateLimitClass::Contacts => &self.contacts,
            RateLimitClass::Transactional => &self.transactional,
        }
    }

    /// Take one token of `class`, waiting once if the bucket is empty.
    pub async fn acquire(&self, class: RateLimitClass) -> Duration {
        let waited = self.bucket(class).acquire(1).await;
        if !waited.is_zero() {
            debug!(%class, waited_ms = waited.as_millis() as u64, "rate limited");
        }
        waited
    }
}
