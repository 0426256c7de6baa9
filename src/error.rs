//! Error types for Filebay.

use thiserror::Error;

/// Common error type for Filebay.
#[derive(Error, Debug)]
pub enum FilebayError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A requested path cannot be resolved inside the storage root.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for Filebay operations.
pub type Result<T> = std::result::Result<T, FilebayError>;
