//! Error types for the SafeUpload client.

use thiserror::Error;

/// Result type for SafeUpload client operations.
pub type Result<T> = std::result::Result<T, SafeUploadError>;

/// SafeUpload client errors.
#[derive(Debug, Error)]
pub enum SafeUploadError {
    /// Configuration error (invalid base URL, client build failure)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout, body decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the service
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response parsed but a field the caller relies on was absent or empty
    #[error("Missing field in response: {0}")]
    MissingField(&'static str),

    /// Local file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
