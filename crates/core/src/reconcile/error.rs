//! Reconciliation error types.

use thiserror::Error;
use vireo_shared::types::TransactionId;

use crate::provider::ProviderError;
use crate::transaction::TransactionError;
use crate::wallet::WalletError;

/// Why one transaction could not be reconciled this cycle.
///
/// None of these are terminal for the transaction itself: it stays
/// `Pending` and the next cycle picks it up again.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A pending transaction has no provider reference to check.
    #[error("Transaction {0} is pending but carries no provider reference")]
    MissingReference(TransactionId),

    /// The settlement check did not answer within the deadline.
    #[error("Settlement check timed out")]
    CheckTimeout,

    /// The provider rejected or failed the settlement check call.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The transaction store failed.
    #[error(transparent)]
    Store(#[from] TransactionError),

    /// Releasing the reservation failed.
    #[error(transparent)]
    Wallet(#[from] WalletError),
}
