//! Error types for the triage pipeline.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, generation, schema validation,
//! retrieval, and input validation.

use thiserror::Error;

/// Unified error type for the triage pipeline.
///
/// All functions in the application return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network or model failure of an underlying generator call
    #[error("Generation error: {0}")]
    Generation(String),

    /// Generator output that could not be parsed into the requested schema
    #[error("Schema validation error: {0}")]
    SchemaValidation(String),

    /// Retrieval service failures
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Invalid caller input (e.g., a nonexistent ingestion path)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
