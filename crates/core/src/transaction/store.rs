//! Transaction store capability trait and the in-memory variant.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;
use vireo_shared::types::TransactionId;

use crate::provider::ProviderReference;
use crate::transaction::error::TransactionError;
use crate::transaction::types::{
    CreateTransactionInput, DEFAULT_CURRENCY, Transaction, TransactionFilter, TransactionStatus,
};

/// Owns transaction records and their guarded state transitions.
///
/// `transition` is the only way a status changes after creation, and
/// implementations must apply it atomically per record: when two
/// callers race, exactly one observes `Ok`.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Creates a record in `New` status and assigns its ID.
    async fn save(&self, input: CreateTransactionInput) -> Result<Transaction, TransactionError>;

    /// Fetches a single transaction.
    async fn find_by_id(
        &self,
        id: TransactionId,
    ) -> Result<Option<Transaction>, TransactionError>;

    /// Fetches all transactions currently in `status`, oldest first.
    async fn find_by_status(
        &self,
        status: TransactionStatus,
    ) -> Result<Vec<Transaction>, TransactionError>;

    /// Lists transactions matching the filter, oldest first.
    async fn list(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, TransactionError>;

    /// Moves a transaction to `to`, recording the provider reference
    /// if given.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown IDs, `InvalidTransition` when the edge
    /// is not legal from the record's current status. Nothing changes
    /// on error.
    async fn transition(
        &self,
        id: TransactionId,
        to: TransactionStatus,
        provider_ref: Option<ProviderReference>,
    ) -> Result<Transaction, TransactionError>;
}

/// In-memory transaction store.
///
/// Records live in a sharded map keyed by ID; transitions run under
/// the record's entry guard so the status check and update are one
/// atomic step.
#[derive(Debug, Default)]
pub struct InMemoryTransactionStore {
    records: DashMap<TransactionId, Transaction>,
    sequence: AtomicI64,
}

impl InMemoryTransactionStore {
    /// Creates an empty store. IDs start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn save(&self, input: CreateTransactionInput) -> Result<Transaction, TransactionError> {
        let id = TransactionId::from_i64(self.sequence.fetch_add(1, Ordering::SeqCst) + 1);
        let now = Utc::now();

        let transaction = Transaction {
            id,
            user_id: input.user_id,
            amount: input.amount,
            currency: DEFAULT_CURRENCY.to_string(),
            status: TransactionStatus::New,
            country: input.country,
            origin: input.origin,
            provider_ref: None,
            created_at: now,
            updated_at: now,
        };

        self.records.insert(id, transaction.clone());
        debug!(transaction_id = %id, user_id = %transaction.user_id, "transaction created");
        Ok(transaction)
    }

    async fn find_by_id(
        &self,
        id: TransactionId,
    ) -> Result<Option<Transaction>, TransactionError> {
        Ok(self.records.get(&id).map(|record| record.clone()))
    }

    async fn find_by_status(
        &self,
        status: TransactionStatus,
    ) -> Result<Vec<Transaction>, TransactionError> {
        let mut matches: Vec<Transaction> = self
            .records
            .iter()
            .filter(|record| record.status == status)
            .map(|record| record.clone())
            .collect();
        matches.sort_by_key(|transaction| transaction.id);
        Ok(matches)
    }

    async fn list(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, TransactionError> {
        let mut matches: Vec<Transaction> = self
            .records
            .iter()
            .filter(|record| {
                filter.status.is_none_or(|status| record.status == status)
                    && filter
                        .user_id
                        .as_ref()
                        .is_none_or(|user_id| &record.user_id == user_id)
            })
            .map(|record| record.clone())
            .collect();
        matches.sort_by_key(|transaction| transaction.id);
        Ok(matches)
    }

    async fn transition(
        &self,
        id: TransactionId,
        to: TransactionStatus,
        provider_ref: Option<ProviderReference>,
    ) -> Result<Transaction, TransactionError> {
        let mut record = self
            .records
            .get_mut(&id)
            .ok_or(TransactionError::NotFound(id))?;

        if !record.status.can_transition_to(to) {
            return Err(TransactionError::InvalidTransition {
                from: record.status,
                to,
            });
        }

        record.status = to;
        if let Some(reference) = provider_ref {
            record.provider_ref = Some(reference);
        }
        record.updated_at = Utc::now();

        debug!(transaction_id = %id, status = %to, "transaction transitioned");
        Ok(record.clone())
    }
}
