//! WorldWise client library.
//!
//! Provides the pieces a front end needs to track visited cities:
//!
//! - [`api`] - the [`CityService`](api::CityService) port and its reqwest adapter
//! - [`cities`] - the cities store (cache of the backend list plus selection)
//! - [`auth`] - the auth store (fixed-credential sign-in)
//! - [`state`] - [`AppState`], which wires both stores for one session
//!
//! # Flow
//!
//! 1. A front end calls a store operation
//! 2. The store dispatches an action
//! 3. A pure reducer computes the next state
//! 4. Subscribers are notified through a `tokio::sync::watch` channel

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cities;
pub mod config;
pub mod error;
pub mod state;

pub use config::ClientConfig;
pub use error::AppError;
pub use state::AppState;
