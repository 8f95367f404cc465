//! Cities actions and the transition function.

use worldwise_core::{City, CityId};

use super::CitiesState;

/// Error shown when the initial load fails.
pub const LOAD_ERROR: &str = "There was an error while loading the data...";
/// Error shown when fetching a single city fails.
pub const GET_ERROR: &str = "There was an error while getting a city!";
/// Error shown when creating a city fails.
pub const CREATE_ERROR: &str = "There was an error while creating a city!";
/// Error shown when deleting a city fails.
pub const DELETE_ERROR: &str = "There was an error while deleting a city!";

/// Everything that can happen to [`CitiesState`].
#[derive(Debug, Clone, PartialEq)]
pub enum CitiesAction {
    /// An operation started.
    Loading,
    /// The full list arrived.
    CitiesLoaded(Vec<City>),
    /// A single city arrived.
    CityLoaded(City),
    /// The backend stored a new city.
    CityCreated(City),
    /// The backend deleted a city.
    CityDeleted(CityId),
    /// An operation failed with the given message.
    Rejected(String),
}

impl CitiesAction {
    /// Short name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::CitiesLoaded(_) => "cities/loaded",
            Self::CityLoaded(_) => "city/loaded",
            Self::CityCreated(_) => "city/created",
            Self::CityDeleted(_) => "city/deleted",
            Self::Rejected(_) => "rejected",
        }
    }
}

/// Compute the next state. Pure; the error message is cleared by every
/// successful result and set only by [`CitiesAction::Rejected`].
#[must_use]
pub fn reduce(state: CitiesState, action: CitiesAction) -> CitiesState {
    match action {
        CitiesAction::Loading => CitiesState {
            is_loading: true,
            ..state
        },
        CitiesAction::CitiesLoaded(cities) => CitiesState {
            cities,
            is_loading: false,
            error: String::new(),
            ..state
        },
        CitiesAction::CityLoaded(city) => CitiesState {
            current_city: Some(city),
            is_loading: false,
            error: String::new(),
            ..state
        },
        CitiesAction::CityCreated(city) => {
            let mut cities = state.cities;
            cities.push(city.clone());
            CitiesState {
                cities,
                is_loading: false,
                current_city: Some(city),
                error: String::new(),
            }
        }
        CitiesAction::CityDeleted(id) => {
            let mut cities = state.cities;
            cities.retain(|city| city.id != id);
            CitiesState {
                cities,
                is_loading: false,
                current_city: None,
                error: String::new(),
            }
        }
        CitiesAction::Rejected(error) => CitiesState {
            is_loading: false,
            error,
            ..state
        },
    }
}
