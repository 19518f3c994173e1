//! Settlement provider interface and sandbox variant.
//!
//! The provider is an external authorization and settlement oracle.
//! It is slow, can fail, and is never trusted with ledger state:
//! - Provider reference and settlement check types
//! - The provider capability trait
//! - Error types for provider calls
//! - A deterministic sandbox for development and demos

pub mod error;
pub mod sandbox;
pub mod service;
pub mod types;

pub use error::ProviderError;
pub use sandbox::SandboxProvider;
pub use service::SettlementProvider;
pub use types::{ProviderReference, SettlementCheck};
