//! Error types for the liftgen_core library.
//!
//! The generation engine itself never fails; these errors cover the
//! ambient layers around it (configuration, validation, persistence).

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for liftgen_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
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

    /// Caller-level input validation error (e.g. nothing selected)
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Unknown muscle group key
    #[error("Unknown muscle group: {0}")]
    UnknownMuscleGroup(String),

    /// Exercise library validation error
    #[error("Library validation error: {0}")]
    LibraryValidation(String),

    /// No saved template has this id
    #[error("Template not found: {0}")]
    TemplateNotFound(uuid::Uuid),
}
