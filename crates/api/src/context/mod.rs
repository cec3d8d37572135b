//! Application context - dependency injection container

use std::sync::Arc;

use tracing::info;
use verdant_core::{
    EmailMarketingProvider, LeadCaptureService, MarketingService, MarketingSettings,
    OrganizationService,
};
use verdant_domain::{Config, Environment, ProviderError, TaxonomyFolder};
use verdant_infra::BrevoClient;

/// Type alias for the provider port trait object
type DynProvider = dyn EmailMarketingProvider;

/// Application context - holds the provider client and the services built on it
///
/// Cheap to clone; handlers receive it as axum state.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub provider: Arc<DynProvider>,
    pub marketing: MarketingService,
    pub lead_capture: Arc<LeadCaptureService>,
    /// Unpaced: an HTTP caller is waiting on the response.
    pub organization: Arc<OrganizationService>,
}

impl AppContext {
    /// Build the context around the real Brevo client.
    pub fn new(config: Config) -> Result<Self, ProviderError> {
        let client = BrevoClient::from_config(&config)?;
        info!(
            environment = %config.environment,
            base_url = %config.provider.base_url,
            "brevo client initialised"
        );
        Ok(Self::with_provider(config, Arc::new(client)))
    }

    /// Build the context around any provider implementation.
    pub fn with_provider(config: Config, provider: Arc<DynProvider>) -> Self {
        let marketing = MarketingService::new(Arc::clone(&provider))
            .with_settings(MarketingSettings::from_config(&config));
        let lead_capture = Arc::new(LeadCaptureService::new(marketing.clone()));
        let organization = Arc::new(OrganizationService::new(Arc::clone(&provider)));

        Self { config: Arc::new(config), provider, marketing, lead_capture, organization }
    }

    pub fn environment(&self) -> Environment {
        self.config.environment
    }

    pub fn taxonomy(&self) -> Vec<TaxonomyFolder> {
        self.config.taxonomy()
    }
}
