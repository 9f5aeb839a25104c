//! Error types for httpsnap

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for httpsnap operations
pub type Result<T> = std::result::Result<T, SnapError>;

/// Errors that can occur in httpsnap
#[derive(Debug, Error)]
pub enum SnapError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Stored snapshot record could not be parsed
    #[error("Malformed snapshot record at {path}: {source}")]
    MalformedRecord {
        /// Path of the unparsable record file
        path: PathBuf,
        /// Underlying JSON parse error
        source: serde_json::Error,
    },

    /// Snapshot record could not be serialized for writing
    #[error("Failed to serialize snapshot record: {0}")]
    Serialize(serde_json::Error),

    /// Request URL could not be parsed
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
