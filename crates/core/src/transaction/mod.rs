//! Payment transaction records and state machine.
//!
//! This module owns the lifecycle of a payment:
//! - Transaction status enum with the legal transition edges
//! - Transaction records and creation input
//! - The transaction store capability trait
//! - The in-memory store with atomic guarded transitions

pub mod error;
pub mod store;
pub mod types;

pub use error::TransactionError;
pub use store::{InMemoryTransactionStore, TransactionStore};
pub use types::{
    CreateTransactionInput, DEFAULT_CURRENCY, Transaction, TransactionFilter, TransactionStatus,
};
