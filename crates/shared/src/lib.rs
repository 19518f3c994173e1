//! Shared types and configuration for Vireo.
//!
//! This crate provides common types used across all other crates:
//! - Monetary amount helpers with fixed decimal precision
//! - Typed IDs for type-safe entity references
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
