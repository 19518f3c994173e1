//! Payment authorization orchestration.
//!
//! This module drives a payment from request to outcome:
//! - Payment request and error taxonomy
//! - The coordinator: compliance gate, fund lock, provider
//!   authorization, and compensation on failure

pub mod coordinator;
pub mod error;


pub use coordinator::{PaymentCoordinator, PaymentRequest};
pub use error::PaymentError;
