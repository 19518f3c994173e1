//! Asynchronous settlement reconciliation.
//!
//! - [`Reconciler`]: drives pending transactions to their terminal
//!   states by polling the settlement provider
//! - [`CycleSummary`]: outcome tallies for one reconciliation cycle
//! - [`ReconcileError`]: why a single transaction could not be checked

pub mod error;
pub mod reconciler;

#[cfg(test)]
mod tests;

pub use error::ReconcileError;
pub use reconciler::{CycleSummary, Reconciler};
