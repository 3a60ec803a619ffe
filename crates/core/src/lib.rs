//! Triage Core Library
//!
//! This crate provides the foundational utilities for the triage pipeline:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management (including the compliance policy)

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, CompliancePolicy};
pub use error::{AppError, AppResult};
