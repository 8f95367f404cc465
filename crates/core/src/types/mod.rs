//! Core types for WorldWise.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod city;
pub mod email;
pub mod id;
pub mod position;

pub use city::{City, Country, NewCity};
pub use email::{Email, EmailError};
pub use id::{CityId, CityIdError};
pub use position::{Position, PositionError};
