//! City service port and its HTTP adapter.
//!
//! The stores only see [`CityService`]; [`HttpCityService`] is the reqwest
//! implementation talking to the REST backend:
//!
//! | Operation     | Request                      |
//! |---------------|------------------------------|
//! | list cities   | `GET {base}/cities`          |
//! | get city      | `GET {base}/cities/{id}`     |
//! | create city   | `POST {base}/cities/` (JSON) |
//! | delete city   | `DELETE {base}/cities/{id}`  |

mod error;
mod http;

use async_trait::async_trait;
use worldwise_core::{City, CityId, NewCity};

pub use error::ApiError;
pub use http::HttpCityService;

/// Access to the backend that owns the city records.
#[async_trait]
pub trait CityService: Send + Sync {
    /// Fetch every stored city, in backend order.
    async fn list_cities(&self) -> Result<Vec<City>, ApiError>;

    /// Fetch a single city.
    async fn get_city(&self, id: CityId) -> Result<City, ApiError>;

    /// Store a new city and return the record with its assigned id.
    async fn create_city(&self, city: &NewCity) -> Result<City, ApiError>;

    /// Delete a city. The response body is ignored.
    async fn delete_city(&self, id: CityId) -> Result<(), ApiError>;
}
