//! Geographic coordinates.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when building a [`Position`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PositionError {
    /// Latitude outside [-90, 90] or not finite.
    #[error("latitude must be between -90 and 90 (got {0})")]
    Latitude(f64),
    /// Longitude outside [-180, 180] or not finite.
    #[error("longitude must be between -180 and 180 (got {0})")]
    Longitude(f64),
}

/// A latitude/longitude pair in decimal degrees.
///
/// [`Position::new`] validates ranges. Deserialization does not, since
/// records coming back from the backend are taken as they are.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Position {
    /// Create a validated position.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError`] if either coordinate is out of range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, PositionError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(PositionError::Latitude(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(PositionError::Longitude(lng));
        }
        Ok(Self { lat, lng })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lng)
    }
}
