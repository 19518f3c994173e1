//! Geographic origin classification and policy gating.
//!
//! This module decides whether a payment may proceed based on where
//! the request originates:
//! - Country codes for classified origins
//! - A pluggable classifier from network address to country
//! - The compliance gate that applies the jurisdiction allow-list

pub mod classifier;
pub mod country;
pub mod gate;

pub use classifier::{GeoClassifier, PrefixGeoClassifier};
pub use country::CountryCode;
pub use gate::{ComplianceDecision, ComplianceGate};
