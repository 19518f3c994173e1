//! Settlement provider capability trait.

use async_trait::async_trait;
use rust_decimal::Decimal;
use vireo_shared::types::UserId;

use crate::compliance::CountryCode;
use crate::provider::error::ProviderError;
use crate::provider::types::{ProviderReference, SettlementCheck};

/// External authorization and settlement oracle.
///
/// Callers own all timeouts; implementations may take as long as the
/// wire does. A returned reference means the provider accepted the
/// payment for settlement, nothing more.
#[async_trait]
pub trait SettlementProvider: Send + Sync {
    /// Asks the provider to authorize a payment.
    ///
    /// # Errors
    ///
    /// `Declined` when the provider rejects the payment,
    /// `Unavailable` when the call cannot complete.
    async fn authorize(
        &self,
        user_id: &UserId,
        amount: Decimal,
        country: &CountryCode,
    ) -> Result<ProviderReference, ProviderError>;

    /// Asks whether an authorized payment has settled.
    async fn check_settlement(
        &self,
        reference: &ProviderReference,
    ) -> Result<SettlementCheck, ProviderError>;
}
