//! City service errors.

use thiserror::Error;

/// Errors that can occur when talking to the city service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("city service request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Service answered with a non-success status (strict mode only).
    #[error("city service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("city service response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// Base URL cannot carry path segments.
    #[error("invalid city service URL: {0}")]
    InvalidUrl(String),
}
