//! Cached view of the city records.

use std::collections::HashSet;

use worldwise_core::{City, CityId, Country};

/// State published by the [`CitiesStore`](super::CitiesStore).
///
/// `cities` is a possibly-stale copy of the backend list, in backend order.
/// `current_city` doubles as a one-slot cache for [`cached`](Self::cached).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitiesState {
    /// Cached city records, in the order the backend returned them.
    pub cities: Vec<City>,
    /// True only while an operation is in flight.
    pub is_loading: bool,
    /// The selected city, if any.
    pub current_city: Option<City>,
    /// Message of the last failed operation; empty when none.
    pub error: String,
}

impl CitiesState {
    /// The selected city, if it is the one with `id`.
    #[must_use]
    pub fn cached(&self, id: CityId) -> Option<&City> {
        self.current_city.as_ref().filter(|city| city.id == id)
    }

    /// Look up a city in the cached list.
    #[must_use]
    pub fn find(&self, id: CityId) -> Option<&City> {
        self.cities.iter().find(|city| city.id == id)
    }

    /// Whether the last failed operation left a message behind.
    #[must_use]
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// Distinct countries among the cached cities, in first-seen order.
    #[must_use]
    pub fn countries(&self) -> Vec<Country> {
        let mut seen = HashSet::new();
        self.cities
            .iter()
            .filter(|city| seen.insert(city.country.as_str()))
            .map(|city| Country {
                country: city.country.clone(),
                emoji: city.emoji.clone(),
            })
            .collect()
    }
}
