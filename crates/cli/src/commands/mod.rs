//! CLI command implementations.

pub mod cities;

use thiserror::Error;
use worldwise_client::{AppError, AppState};
use worldwise_core::PositionError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Library error (config, auth, city service).
    #[error(transparent)]
    App(#[from] AppError),

    /// Coordinates given on the command line are out of range.
    #[error("Invalid position: {0}")]
    Position(#[from] PositionError),

    /// The cities store reported a failed load.
    #[error("{0}")]
    Unavailable(String),

    /// Credentials were not supplied.
    #[error("Missing credentials: pass --email/--password or set WORLDWISE_EMAIL/WORLDWISE_PASSWORD")]
    MissingCredentials,
}

/// Sign in with the supplied credentials.
///
/// # Errors
///
/// Returns `CliError::MissingCredentials` if either value is absent, or the
/// auth error when they do not match.
pub fn login(
    state: &AppState,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<(), CliError> {
    let (Some(email), Some(password)) = (email, password) else {
        return Err(CliError::MissingCredentials);
    };

    state
        .auth()
        .login(email, password)
        .map_err(AppError::from)?;
    Ok(())
}

/// Print the signed-in user.
#[allow(clippy::print_stdout)]
pub fn whoami(state: &AppState) -> Result<(), CliError> {
    let user = state.require_user()?;
    println!("{} <{}>", user.name, user.email);
    println!("avatar: {}", user.avatar);
    println!("backend: {}", state.config().api_url);
    Ok(())
}
