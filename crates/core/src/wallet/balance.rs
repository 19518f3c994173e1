//! Account balance snapshots.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Point-in-time view of a custodial account.
///
/// Invariant: `0 <= locked <= total`, and `available` is always
/// `total - locked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Everything the account holds, including reservations.
    pub total: Decimal,
    /// Amount reserved for in-flight payments.
    pub locked: Decimal,
    /// Amount spendable right now.
    pub available: Decimal,
}

impl AccountBalance {
    /// Creates a snapshot from the stored totals.
    #[must_use]
    pub fn new(total: Decimal, locked: Decimal) -> Self {
        Self {
            total,
            locked,
            available: total - locked,
        }
    }

    /// An empty account. Unknown users read as this, not as an error.
    #[must_use]
    pub fn zero() -> Self {
        Self::new(Decimal::ZERO, Decimal::ZERO)
    }
}
