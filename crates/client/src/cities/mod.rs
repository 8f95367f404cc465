//! Cities store.
//!
//! Single source of truth for the visited cities and the selected city.
//! [`CitiesStore`] owns all city I/O; [`reduce`] is the pure transition
//! function behind it.

mod reducer;
mod state;
mod store;

pub use reducer::{CREATE_ERROR, CitiesAction, DELETE_ERROR, GET_ERROR, LOAD_ERROR, reduce};
pub use state::CitiesState;
pub use store::{CitiesError, CitiesStore};
