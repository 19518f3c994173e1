//! Settlement provider domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference the provider hands back for an authorized payment.
///
/// Stored on the transaction and used for every later settlement
/// check. The format belongs to the provider; nothing here parses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderReference(String);

impl ProviderReference {
    /// Wraps a raw provider reference.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a settlement status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementCheck {
    /// The payment settled; funds are spent for good.
    Settled,
    /// The provider has not finished; check again next cycle.
    StillPending,
    /// The provider rejected settlement; the reservation must be
    /// returned.
    Denied,
}
