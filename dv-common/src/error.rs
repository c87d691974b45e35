//! Common error types for the DoubleVisuals site

use thiserror::Error;

/// Common result type for site operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the site crates
///
/// None of these are fatal inside the core: callers degrade to a safe
/// default (placeholder artifact, banner shown again, silence).
#[derive(Error, Debug)]
pub enum Error {
    /// Resolver could not classify a pasted URL
    #[error("Unrecognized video source: {0}")]
    UnrecognizedSource(String),

    /// A persistence backend is disabled, missing or over quota
    #[error("Storage unavailable ({backend}): {reason}")]
    StorageUnavailable { backend: String, reason: String },

    /// Audio context could not be constructed or rejected a buffer
    #[error("Audio unavailable: {0}")]
    AudioUnavailable(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Shorthand for a storage failure on a named backend
    pub fn storage(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::StorageUnavailable {
            backend: backend.into(),
            reason: reason.into(),
        }
    }
}
