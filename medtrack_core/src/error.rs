//! Error types for the medtrack_core library.

use crate::MedicationId;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for medtrack_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Medication creation input was rejected
    #[error("Validation error: {0}")]
    Validation(String),

    /// A dose event referenced a medication that is not registered
    #[error("Medication {0} not found")]
    NotFound(MedicationId),

    /// Date string was malformed or out of range
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Frequency name could not be parsed
    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Snapshot or shared-store state error
    #[error("State error: {0}")]
    State(String),
}
