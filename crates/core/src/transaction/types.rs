//! Transaction domain types and lifecycle states.
//!
//! A transaction is created only after funds are locked, so every
//! non-terminal record corresponds to a live reservation. The valid
//! transitions are:
//! - New → Pending (authorization succeeded)
//! - New → Failed (authorization declined or provider unreachable)
//! - Pending → Settled (settlement confirmed)
//! - Pending → Failed (settlement denied)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use vireo_shared::types::{TransactionId, UserId};

use crate::compliance::CountryCode;
use crate::provider::ProviderReference;

/// Currency every transaction is denominated in at creation.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Transaction status in the payment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    /// Funds are locked; authorization has not completed yet.
    New,
    /// Authorized by the provider; awaiting settlement.
    Pending,
    /// Settlement confirmed (terminal).
    Settled,
    /// Authorization or settlement failed; funds released (terminal).
    Failed,
}

impl TransactionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Pending => "PENDING",
            Self::Settled => "SETTLED",
            Self::Failed => "FAILED",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "NEW" => Some(Self::New),
            "PENDING" => Some(Self::Pending),
            "SETTLED" => Some(Self::Settled),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Returns true if the status can never change again.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled | Self::Failed)
    }

    /// Check if a status transition is valid.
    ///
    /// Terminal states have no outgoing edges, which is what makes
    /// the failure release exactly-once: only the caller whose
    /// transition commits may touch the ledger.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::New, Self::Pending | Self::Failed) | (Self::Pending, Self::Settled | Self::Failed)
        )
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A payment transaction record.
///
/// Owned by the transaction store; everything else works on copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Store-assigned identifier.
    pub id: TransactionId,
    /// Account the payment debits.
    pub user_id: UserId,
    /// Payment amount at money scale.
    pub amount: Decimal,
    /// ISO currency code.
    pub currency: String,
    /// Current lifecycle status.
    pub status: TransactionStatus,
    /// Country the origin resolved to at creation.
    pub country: CountryCode,
    /// Network address the payment originated from.
    pub origin: String,
    /// Settlement provider reference, set once authorized.
    pub provider_ref: Option<ProviderReference>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record last changed.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Account the payment debits.
    pub user_id: UserId,
    /// Payment amount at money scale.
    pub amount: Decimal,
    /// Country the origin resolved to.
    pub country: CountryCode,
    /// Network address the payment originated from.
    pub origin: String,
}

/// Filter for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only transactions in this status.
    pub status: Option<TransactionStatus>,
    /// Only transactions for this user.
    pub user_id: Option<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(TransactionStatus::New.as_str(), "NEW");
        assert_eq!(TransactionStatus::Pending.as_str(), "PENDING");
        assert_eq!(TransactionStatus::Settled.as_str(), "SETTLED");
        assert_eq!(TransactionStatus::Failed.as_str(), "FAILED");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            TransactionStatus::parse("pending"),
            Some(TransactionStatus::Pending)
        );
        assert_eq!(
            TransactionStatus::parse("SETTLED"),
            Some(TransactionStatus::Settled)
        );
        assert_eq!(TransactionStatus::parse("unknown"), None);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", TransactionStatus::New), "NEW");
        assert_eq!(format!("{}", TransactionStatus::Failed), "FAILED");
    }

    #[test]
    fn test_terminal_states() {
        assert!(!TransactionStatus::New.is_terminal());
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(TransactionStatus::Settled.is_terminal());
        assert!(TransactionStatus::Failed.is_terminal());
    }

    #[test]
    fn test_valid_transitions() {
        use TransactionStatus::{Failed, New, Pending, Settled};

        assert!(New.can_transition_to(Pending));
        assert!(New.can_transition_to(Failed));
        assert!(Pending.can_transition_to(Settled));
        assert!(Pending.can_transition_to(Failed));
    }

    #[test]
    fn test_invalid_transitions() {
        use TransactionStatus::{Failed, New, Pending, Settled};

        assert!(!New.can_transition_to(Settled));
        assert!(!Pending.can_transition_to(New));
        assert!(!Settled.can_transition_to(Failed));
        assert!(!Settled.can_transition_to(Pending));
        assert!(!Failed.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Settled));
    }
}
