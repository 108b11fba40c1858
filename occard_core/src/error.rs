//! Error types for the occard_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for occard_core operations
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

    /// Archive writing error
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Record store error (corrupt table file, storage fault)
    #[error("Store error: {0}")]
    Store(String),

    /// Malformed media payload (data URI, base64)
    #[error("Media error: {0}")]
    Media(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
