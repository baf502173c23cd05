//! Error types for the dashboard client

use thiserror::Error;

/// Main client error type
#[derive(Error, Debug)]
pub enum ClientError {
    /// The session credential was rejected (HTTP 401). The session has
    /// already been invalidated by the time this error is observed.
    #[error("Session expired: {0}")]
    Unauthorized(String),

    /// Any non-401 HTTP failure, carrying the best-effort message extracted
    /// from the server payload (or the status text when none is present).
    #[error("Request failed: {0}")]
    Http(String),

    /// Transport-level failure: no response was received at all.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected payload: {0}")]
    Payload(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Export failed: {0}")]
    Export(#[from] csv::Error),
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
