//! City records as exchanged with the city service.
//!
//! Field names follow the backend's camelCase JSON (`cityName`, `position`,
//! ...). A [`NewCity`] is what the client sends on creation; the backend
//! answers with the stored [`City`], including its assigned [`CityId`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CityId, Position};

/// A visited city, as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    /// Backend-assigned identifier.
    pub id: CityId,
    /// Display name of the city.
    pub city_name: String,
    /// Country the city belongs to.
    pub country: String,
    /// Flag emoji for the country.
    #[serde(default)]
    pub emoji: String,
    /// When the city was visited.
    pub date: DateTime<Utc>,
    /// Free-form note about the visit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Where the city is.
    pub position: Position,
}

/// A city that has not been stored yet (no identifier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCity {
    /// Display name of the city.
    pub city_name: String,
    /// Country the city belongs to.
    pub country: String,
    /// Flag emoji for the country.
    #[serde(default)]
    pub emoji: String,
    /// When the city was visited.
    pub date: DateTime<Utc>,
    /// Free-form note about the visit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Where the city is.
    pub position: Position,
}

impl NewCity {
    /// Attach a backend-assigned identifier, producing the stored record.
    #[must_use]
    pub fn into_city(self, id: CityId) -> City {
        City {
            id,
            city_name: self.city_name,
            country: self.country,
            emoji: self.emoji,
            date: self.date,
            notes: self.notes,
            position: self.position,
        }
    }
}

/// A distinct country derived from the visited cities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Country {
    /// Country name.
    pub country: String,
    /// Flag emoji.
    pub emoji: String,
}
