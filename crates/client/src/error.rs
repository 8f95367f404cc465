//! Unified error type for front ends built on the stores.

use thiserror::Error;

use crate::api::ApiError;
use crate::auth::AuthError;
use crate::cities::CitiesError;
use crate::config::ConfigError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// City service adapter could not be built.
    #[error("City service error: {0}")]
    Api(#[from] ApiError),

    /// Sign-in failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// A cities store operation failed.
    #[error("{0}")]
    Cities(#[from] CitiesError),

    /// The app section was accessed without signing in.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
