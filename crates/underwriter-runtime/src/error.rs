//! Runtime error types

use std::time::Duration;
use thiserror::Error;

/// Failure of a single decisioning backend invocation
///
/// These never reach callers of the router; they are turned into fallback
/// reasons and logged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Backend selected but not configured (no endpoint, no underwriter)
    #[error("Backend not configured: {0}")]
    NotConfigured(String),

    /// Connection refused, DNS failure, TLS failure
    #[error("Connection failed: {0}")]
    Connect(String),

    /// No answer within the configured bound
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Remote service answered with a non-success status
    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body could not be read as a decision payload
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// In-process underwriter returned an error or panicked
    #[error("Underwriter fault: {0}")]
    Fault(String),

    /// Any other transport-level failure
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            BackendError::Connect(err.to_string())
        } else if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

/// Result type for backend invocations
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Application store error
#[derive(Error, Debug)]
pub enum StoreError {
    /// Application not found
    #[error("Application not found: {0}")]
    NotFound(String),

    /// Stored data could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Database error (when the sqlx feature is enabled)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
