//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::{TransactionId, UserId};
pub use money::{AmountError, MONEY_SCALE, to_money_scale, validate_amount};
