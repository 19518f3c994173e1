//! Payment error taxonomy.
//!
//! Every submission failure maps to exactly one variant, and each
//! variant documents its funds side effect: by the time a caller sees
//! the error, no reservation from this payment survives unless the
//! variant says so.

use rust_decimal::Decimal;
use thiserror::Error;
use vireo_shared::types::AmountError;

use crate::compliance::CountryCode;
use crate::transaction::{Transaction, TransactionError};
use crate::wallet::WalletError;

/// Errors that can occur while processing a payment.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Payment origin is outside the allowed jurisdictions. No funds
    /// were touched and no transaction exists.
    #[error("Payment from {country} is not permitted")]
    GeoBlocked {
        /// Country the origin resolved to.
        country: CountryCode,
    },

    /// The amount is not a valid payment amount.
    #[error(transparent)]
    InvalidAmount(#[from] AmountError),

    /// Available balance cannot cover the payment. No transaction
    /// exists.
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Amount the payment needed.
        requested: Decimal,
        /// Amount currently spendable.
        available: Decimal,
    },

    /// The provider declined the authorization. The reservation was
    /// released; the failed transaction is kept for audit.
    #[error("Authorization declined: {reason}")]
    AuthorizationDeclined {
        /// The transaction, now in `Failed` status.
        transaction: Box<Transaction>,
        /// Provider-supplied reason.
        reason: String,
    },

    /// The provider could not be reached in time. The reservation was
    /// released; retrying the whole submission is safe.
    #[error("Settlement provider unavailable")]
    ProviderUnavailable {
        /// The transaction, now in `Failed` status.
        transaction: Box<Transaction>,
    },

    /// The custodial ledger rejected an operation.
    #[error(transparent)]
    Wallet(WalletError),

    /// The transaction store failed.
    #[error(transparent)]
    Store(#[from] TransactionError),
}

impl From<WalletError> for PaymentError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::InsufficientFunds {
                requested,
                available,
            } => Self::InsufficientFunds {
                requested,
                available,
            },
            other => Self::Wallet(other),
        }
    }
}

impl PaymentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::GeoBlocked { .. } => "GEO_BLOCKED",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::AuthorizationDeclined { .. } => "AUTHORIZATION_DECLINED",
            Self::ProviderUnavailable { .. } => "PROVIDER_UNAVAILABLE",
            Self::Wallet(err) => err.error_code(),
            Self::Store(err) => err.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::GeoBlocked { .. } => 403,
            Self::InvalidAmount(_) => 400,
            Self::InsufficientFunds { .. } => 422,
            Self::AuthorizationDeclined { .. } => 402,
            Self::ProviderUnavailable { .. } => 503,
            Self::Wallet(err) => err.status_code(),
            Self::Store(err) => err.status_code(),
        }
    }

    /// Returns true if retrying the same submission could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProviderUnavailable { .. })
    }
}
