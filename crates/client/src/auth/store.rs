//! Auth state machine and the store that drives it.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{AuthError, Credential, User};

/// Whether someone is signed in. The user is present exactly when
/// authenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    /// Nobody is signed in.
    #[default]
    Unauthenticated,
    /// The given user is signed in.
    Authenticated(User),
}

impl AuthState {
    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Unauthenticated => None,
        }
    }
}

/// Transitions of [`AuthState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    /// Credentials matched; sign in as this user.
    Login(User),
    /// Sign out.
    Logout,
}

/// Compute the next auth state.
#[must_use]
pub fn reduce(_state: AuthState, action: AuthAction) -> AuthState {
    match action {
        AuthAction::Login(user) => AuthState::Authenticated(user),
        AuthAction::Logout => AuthState::Unauthenticated,
    }
}

/// Cheaply cloneable handle over the session's auth state.
#[derive(Debug, Clone)]
pub struct AuthStore {
    inner: Arc<AuthStoreInner>,
}

#[derive(Debug)]
struct AuthStoreInner {
    credential: Credential,
    state: watch::Sender<AuthState>,
}

impl AuthStore {
    /// Create an unauthenticated store accepting `credential`.
    #[must_use]
    pub fn new(credential: Credential) -> Self {
        let (state, _) = watch::channel(AuthState::Unauthenticated);
        Self {
            inner: Arc::new(AuthStoreInner { credential, state }),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user().cloned()
    }

    /// Receiver notified after every transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    fn dispatch(&self, action: AuthAction) {
        debug!(?action, "Dispatching auth action");
        self.inner.state.send_modify(|state| {
            let current = std::mem::take(state);
            *state = reduce(current, action);
        });
    }

    /// Sign in if `email` and `password` match the stored credential.
    ///
    /// On mismatch the state is left untouched (an already signed-in user
    /// stays signed in).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on mismatch.
    pub fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if !self.inner.credential.matches(email, password) {
            warn!("Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let user = self.inner.credential.user().clone();
        self.dispatch(AuthAction::Login(user.clone()));
        info!(email = %user.email, "User logged in");
        Ok(user)
    }

    /// Sign out, whatever the current state.
    pub fn logout(&self) {
        self.dispatch(AuthAction::Logout);
        info!("User logged out");
    }
}
