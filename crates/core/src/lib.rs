//! WorldWise Core - Shared types library.
//!
//! This crate provides the domain types used across all WorldWise components:
//! - `client` - City service adapter, cities store and auth store
//! - `cli` - Command-line front end for the tracked cities
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere, including inside the
//! fake backend used by the integration tests.
//!
//! # Modules
//!
//! - [`types`] - City records, type-safe IDs, coordinates and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
