//! Error types for subset transforms

use thiserror::Error;

/// Error type for subset transforms
#[derive(Error, Debug)]
pub enum Error {
    /// Core library error
    #[error("Core error: {0}")]
    Core(#[from] subset_core::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed scenario description
    #[error("Scenario error: {0}")]
    Scenario(String),
}

/// Result type for subset transforms
pub type Result<T> = std::result::Result<T, Error>;
