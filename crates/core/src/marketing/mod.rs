//! Email-marketing orchestration

pub mod ports;
pub mod service;

pub use ports::{EmailMarketingProvider, ProviderResult};
pub use service::{MarketingService, MarketingSettings};
