//! Core business logic for Vireo.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and orchestration live here.
//!
//! # Modules
//!
//! - `compliance` - Geographic origin classification and policy gating
//! - `wallet` - Custodial balance ledger with fund reservations
//! - `transaction` - Payment transaction records and state machine
//! - `provider` - Settlement provider interface and sandbox variant
//! - `payment` - Payment authorization orchestration
//! - `reconcile` - Background settlement reconciliation

pub mod compliance;
pub mod payment;
pub mod provider;
pub mod reconcile;
pub mod transaction;
pub mod wallet;
