//! Newtype IDs for type-safe entity references.
//!
//! The backend assigns city identifiers. Older backends serve them as JSON
//! numbers, newer ones as numeric strings; [`CityId`] accepts both and always
//! serializes as a number.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Error returned when a city ID cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid city id: {0:?}")]
pub struct CityIdError(String);

/// Backend-assigned identifier of a [`City`](crate::City).
///
/// Only numeric ids are supported. A backend that hands out opaque string
/// ids is rejected at decode time, so every load against it fails.
///
/// # Example
///
/// ```rust
/// # use worldwise_core::CityId;
/// let id: CityId = "73930385".parse().unwrap();
/// assert_eq!(id, CityId::new(73_930_385));
/// assert_eq!(id.to_string(), "73930385");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CityId(i64);

impl CityId {
    /// Create a new ID from an i64 value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for CityId {
    type Err = CityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| CityIdError(s.to_owned()))
    }
}

impl From<i64> for CityId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<CityId> for i64 {
    fn from(id: CityId) -> Self {
        id.0
    }
}

impl<'de> Deserialize<'de> for CityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_number() {
        let id: CityId = serde_json::from_str("7").unwrap();
        assert_eq!(id.as_i64(), 7);
    }

    #[test]
    fn test_deserialize_numeric_string() {
        let id: CityId = serde_json::from_str("\"17806751\"").unwrap();
        assert_eq!(id, CityId::new(17_806_751));
    }

    #[test]
    fn test_deserialize_rejects_non_numeric_string() {
        assert!(serde_json::from_str::<CityId>("\"a3f9\"").is_err());
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&CityId::new(42)).unwrap(), "42");
    }

    #[test]
    fn test_from_str_trims_whitespace() {
        assert_eq!(" 3 ".parse::<CityId>().unwrap(), CityId::new(3));
        assert!("three".parse::<CityId>().is_err());
    }
}
