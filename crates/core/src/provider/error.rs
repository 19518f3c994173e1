//! Settlement provider error types.

use thiserror::Error;

use crate::provider::types::ProviderReference;

/// Errors that can occur during provider calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider rejected the authorization.
    #[error("Authorization declined: {0}")]
    Declined(String),

    /// The provider could not be reached or failed internally.
    #[error("Settlement provider unavailable: {0}")]
    Unavailable(String),

    /// The provider does not recognize the reference.
    #[error("Unknown provider reference: {0}")]
    UnknownReference(ProviderReference),
}

impl ProviderError {
    /// Returns true if retrying the same call could succeed.
    ///
    /// A decline is a business decision; retrying with identical
    /// parameters will not change it.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
