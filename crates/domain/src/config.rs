//! Configuration structures
//!
//! Plain data only. Loading (environment, files) lives in the infra crate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONTACTS_TOKENS_PER_INTERVAL, DEFAULT_PROVIDER_BASE_URL, DEFAULT_TAXONOMY, FOLDER_PACING_MS,
    GENERAL_TOKENS_PER_INTERVAL, LIST_PACING_MS, RATE_LIMIT_INTERVAL_MS,
    TRANSACTIONAL_TOKENS_PER_INTERVAL,
};
use crate::impl_domain_status_conversions;
use crate::{RateLimitClass, Result, Sender, VerdantError};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub rate_limits: RateLimitsConfig,
    pub environment: Environment,
    pub server: ServerConfig,
    pub sender: SenderConfig,
    pub site: SiteConfig,
    pub setup: SetupConfig,
    pub taxonomy: Vec<TaxonomyFolder>,
}

impl Config {
    /// Check the values that cannot be caught by deserialization alone.
    ///
    /// # Errors
    /// Returns `VerdantError::Config` naming the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.provider.api_key.trim().is_empty() {
            return Err(VerdantError::Config("Brevo API key is required".into()));
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(VerdantError::Config("provider base URL must not be empty".into()));
        }
        if self.provider.max_attempts == 0 {
            return Err(VerdantError::Config("provider.max_attempts must be at least 1".into()));
        }
        for class in RateLimitClass::ALL {
            let bucket = self.rate_limits.for_class(class);
            if bucket.tokens_per_interval == 0 || bucket.interval_ms == 0 {
                return Err(VerdantError::Config(format!(
                    "rate limit for {class} must have a positive capacity and interval"
                )));
            }
        }
        Ok(())
    }

    /// Site root embedded in outbound email links.
    pub fn site_url(&self) -> &str {
        if self.environment.is_production() {
            &self.site.production_url
        } else {
            &self.site.development_url
        }
    }

    /// Configured taxonomy, or the built-in one when none is configured.
    pub fn taxonomy(&self) -> Vec<TaxonomyFolder> {
        if self.taxonomy.is_empty() {
            TaxonomyFolder::defaults()
        } else {
            self.taxonomy.clone()
        }
    }
}

/// Provider connection settings
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_PROVIDER_BASE_URL.to_string(),
            timeout_secs: 30,
            max_attempts: 3,
            retry_backoff_ms: 200,
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .finish()
    }
}

/// Token bucket settings for one call class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketConfig {
    pub tokens_per_interval: u64,
    pub interval_ms: u64,
}

/// Per-class quotas, mirroring the provider's published limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitsConfig {
    pub general: BucketConfig,
    pub contacts: BucketConfig,
    pub transactional: BucketConfig,
}

impl Default for RateLimitsConfig {
    fn default() -> Self {
        let hourly = |tokens_per_interval| BucketConfig {
            tokens_per_interval,
            interval_ms: RATE_LIMIT_INTERVAL_MS,
        };
        Self {
            general: hourly(GENERAL_TOKENS_PER_INTERVAL),
            contacts: hourly(CONTACTS_TOKENS_PER_INTERVAL),
            transactional: hourly(TRANSACTIONAL_TOKENS_PER_INTERVAL),
        }
    }
}

impl RateLimitsConfig {
    pub fn for_class(&self, class: RateLimitClass) -> BucketConfig {
        match class {
            RateLimitClass::General => self.general,
            RateLimitClass::Contacts => self.contacts,
            RateLimitClass::Transactional => self.transactional,
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    Development,
    Test,
}

impl_domain_status_conversions!(Environment {
    Production => "production",
    Development => "development",
    Test => "test",
});

impl Environment {
    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: "127.0.0.1:3000".to_string() }
    }
}

/// Sender identity for outbound email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderConfig {
    /// Name used on transactional email
    pub name: String,
    /// Name used on bulk campaigns
    pub campaign_name: String,
    pub email: String,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            name: "Dr. Sebi Approved Team".to_string(),
            campaign_name: "Dr. Sebi Approved".to_string(),
            email: "info@drsebiapproved.com".to_string(),
        }
    }
}

impl SenderConfig {
    pub fn transactional(&self) -> Sender {
        Sender { name: self.name.clone(), email: self.email.clone() }
    }

    pub fn campaign(&self) -> Sender {
        Sender { name: self.campaign_name.clone(), email: self.email.clone() }
    }
}

/// Public site roots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub production_url: String,
    pub development_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            production_url: "https://drsebiapproved.com".to_string(),
            development_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Cooperative delays between bulk set-up calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    pub folder_pacing_ms: u64,
    pub list_pacing_ms: u64,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self { folder_pacing_ms: FOLDER_PACING_MS, list_pacing_ms: LIST_PACING_MS }
    }
}

/// A folder and the lists that belong in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyFolder {
    pub name: String,
    #[serde(default)]
    pub lists: Vec<String>,
}

impl TaxonomyFolder {
    pub fn defaults() -> Vec<Self> {
        DEFAULT_TAXONOMY
            .iter()
            .map(|(folder, lists)| Self {
                name: (*folder).to_string(),
                lists: lists.iter().map(|list| (*list).to_string()).collect(),
            })
            .collect()
    }
}
