//! Deterministic sandbox settlement provider.
//!
//! Stands in for the real provider during development and demos:
//! authorizes anything up to a fixed cap after a simulated network
//! delay, then reports settlement once a fixed hold time has passed.
//! No randomness; the same run always behaves the same.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::time::sleep;
use tracing::debug;
use uuid::Uuid;
use vireo_shared::types::UserId;

use crate::compliance::CountryCode;
use crate::provider::error::ProviderError;
use crate::provider::service::SettlementProvider;
use crate::provider::types::{ProviderReference, SettlementCheck};

/// Sandbox settlement provider.
pub struct SandboxProvider {
    max_amount: Decimal,
    latency: Duration,
    settle_after: Duration,
    authorized: DashMap<ProviderReference, Instant>,
}

impl SandboxProvider {
    /// Creates a sandbox that approves amounts up to `max_amount`,
    /// answers after `latency`, and settles `settle_after` after
    /// authorization.
    #[must_use]
    pub fn new(max_amount: Decimal, latency: Duration, settle_after: Duration) -> Self {
        Self {
            max_amount,
            latency,
            settle_after,
            authorized: DashMap::new(),
        }
    }

    fn new_reference() -> ProviderReference {
        let id = Uuid::new_v4().simple().to_string();
        ProviderReference::new(format!("HK_{}", &id[..8]))
    }
}

#[async_trait]
impl SettlementProvider for SandboxProvider {
    async fn authorize(
        &self,
        user_id: &UserId,
        amount: Decimal,
        country: &CountryCode,
    ) -> Result<ProviderReference, ProviderError> {
        sleep(self.latency).await;

        if amount > self.max_amount {
            debug!(
                user_id = %user_id,
                amount = %amount,
                country = %country,
                "sandbox declined authorization"
            );
            return Err(ProviderError::Declined(format!(
                "amount {amount} exceeds sandbox limit {}",
                self.max_amount
            )));
        }

        let reference = Self::new_reference();
        self.authorized.insert(reference.clone(), Instant::now());
        debug!(
            user_id = %user_id,
            amount = %amount,
            country = %country,
            provider_ref = %reference,
            "sandbox authorized payment"
        );
        Ok(reference)
    }

    async fn check_settlement(
        &self,
        reference: &ProviderReference,
    ) -> Result<SettlementCheck, ProviderError> {
        sleep(self.latency).await;

        let authorized_at = self
            .authorized
            .get(reference)
            .map(|entry| *entry.value())
            .ok_or_else(|| ProviderError::UnknownReference(reference.clone()))?;

        if authorized_at.elapsed() >= self.settle_after {
            Ok(SettlementCheck::Settled)
        } else {
            Ok(SettlementCheck::StillPending)
        }
    }
}
