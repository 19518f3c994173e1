//! Wallet error types for ledger operations.

use rust_decimal::Decimal;
use thiserror::Error;
use vireo_shared::types::AmountError;

/// Errors that can occur during wallet operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// Available balance cannot cover the requested lock.
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Amount the caller tried to lock.
        requested: Decimal,
        /// Amount currently spendable.
        available: Decimal,
    },

    /// Attempted to release more than is locked.
    ///
    /// This is an accounting invariant violation, not a caller mistake:
    /// every release must correspond to an earlier lock.
    #[error("Cannot release more funds than locked: requested {requested}, locked {locked}")]
    InsufficientLockedFunds {
        /// Amount the caller tried to release.
        requested: Decimal,
        /// Amount currently locked.
        locked: Decimal,
    },

    /// The amount is not a valid monetary value.
    #[error(transparent)]
    InvalidAmount(#[from] AmountError),
}

impl WalletError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::InsufficientLockedFunds { .. } => "INSUFFICIENT_LOCKED_FUNDS",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InsufficientFunds { .. } => 422,
            // Over-release means the books are wrong; surface as internal.
            Self::InsufficientLockedFunds { .. } => 500,
            Self::InvalidAmount(_) => 400,
        }
    }

    /// Returns true if this error means the ledger books are corrupt.
    #[must_use]
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InsufficientLockedFunds { .. })
    }
}
