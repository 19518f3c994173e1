//! Custodial balance ledger with fund reservations.
//!
//! This module implements the funds side of payment authorization:
//! - Account balance snapshots (total, locked, available)
//! - The wallet service capability trait
//! - The in-process custodial wallet with per-account atomic updates
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod service;

#[cfg(test)]
mod service_props;

pub use balance::AccountBalance;
pub use error::WalletError;
pub use service::{CustodialWallet, WalletService};
