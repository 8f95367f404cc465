//! The signed-in user and the credential that unlocks it.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use worldwise_core::{Email, EmailError};

const DEMO_NAME: &str = "Jack";
const DEMO_EMAIL: &str = "user@email.com";
const DEMO_PASSWORD: &str = "password";
const DEMO_AVATAR: &str = "https://i.pravatar.cc/100?u=zz";

/// A signed-in user. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Display name.
    pub name: String,
    /// Email address used to sign in.
    pub email: Email,
    /// Avatar image URL.
    pub avatar: String,
}

/// The single user/password pair accepted by the auth store.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct Credential {
    user: User,
    password: SecretString,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Credential {
    /// Create a credential for `user`.
    #[must_use]
    pub const fn new(user: User, password: SecretString) -> Self {
        Self { user, password }
    }

    /// The built-in demo account (`user@email.com` / `password`).
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the built-in email fails validation.
    pub fn demo() -> Result<Self, EmailError> {
        let user = User {
            name: DEMO_NAME.to_string(),
            email: Email::parse(DEMO_EMAIL)?,
            avatar: DEMO_AVATAR.to_string(),
        };
        Ok(Self::new(user, SecretString::from(DEMO_PASSWORD)))
    }

    /// The user this credential signs in as.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Exact comparison of both fields; the password in constant time.
    #[must_use]
    pub fn matches(&self, email: &str, password: &str) -> bool {
        let email_ok = self.user.email.as_str() == email;
        let password_ok = constant_time_compare(self.password.expose_secret(), password);
        email_ok && password_ok
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}
