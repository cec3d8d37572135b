//! Conversions from external infrastructure errors into provider errors.

use reqwest::Error as HttpError;
use thiserror::Error;
use verdant_domain::ProviderError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct InfraError(#[from] pub ProviderError);

impl From<InfraError> for ProviderError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

trait IntoProviderError {
    fn into_provider(self) -> ProviderError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ProviderError */
/* -------------------------------------------------------------------------- */

impl IntoProviderError for HttpError {
    fn into_provider(self) -> ProviderError {
        if self.is_timeout() {
            return ProviderError::timeout("HTTP request timed out");
        }

        if self.is_connect() {
            return ProviderError::transport(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return ProviderError::Config(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() {
            return ProviderError::Decode(self.to_string());
        }

        ProviderError::transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_provider())
    }
}
