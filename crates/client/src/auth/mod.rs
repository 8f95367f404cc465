//! Auth store.
//!
//! Gates the app behind a single fixed credential. There is no backend and
//! nothing is persisted: the state lives as long as the [`AuthStore`].

mod error;
mod store;
mod user;

pub use error::AuthError;
pub use store::{AuthAction, AuthState, AuthStore, reduce};
pub use user::{Credential, User};
