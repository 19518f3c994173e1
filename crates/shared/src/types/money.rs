//! Monetary amount helpers with fixed decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` values carried at a fixed
//! scale of two decimal places.

use rust_decimal::Decimal;
use thiserror::Error;

/// Number of decimal places every stored amount carries.
pub const MONEY_SCALE: u32 = 2;

/// Rejection reasons for amounts arriving at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The amount is zero or negative.
    #[error("amount must be positive, got {0}")]
    NotPositive(Decimal),

    /// The amount carries more precision than the ledger stores.
    #[error("amount {0} has more than {MONEY_SCALE} decimal places")]
    PrecisionExceeded(Decimal),
}

/// Validates a payment or funding amount.
///
/// Amounts must be strictly positive and representable at
/// [`MONEY_SCALE`] without rounding.
///
/// # Errors
///
/// Returns `AmountError` describing which rule the amount broke.
pub fn validate_amount(amount: Decimal) -> Result<(), AmountError> {
    if amount <= Decimal::ZERO {
        return Err(AmountError::NotPositive(amount));
    }
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(AmountError::PrecisionExceeded(amount));
    }
    Ok(())
}

/// Rescales a validated amount to exactly [`MONEY_SCALE`] decimal places.
///
/// Only pads with zeros; call [`validate_amount`] first so no precision
/// can be lost here.
#[must_use]
pub fn to_money_scale(amount: Decimal) -> Decimal {
    let mut scaled = amount.normalize();
    scaled.rescale(MONEY_SCALE);
    scaled
}
