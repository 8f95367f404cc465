//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Email or password did not match the stored credential.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The stored credential carries a malformed email.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] worldwise_core::EmailError),
}
