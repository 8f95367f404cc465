//! Reqwest-backed city service adapter.
//!
//! Owns transport details only: URL building, timeouts, status handling and
//! JSON decoding into core types.
//!
//! # Status handling
//!
//! By default a non-2xx response is not an error on its own: if the body
//! still decodes, the call succeeds (a `warn!` is logged so the mismatch is
//! visible). With `strict_status` enabled, non-2xx responses fail with
//! [`ApiError::Status`] before the body is decoded.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;
use worldwise_core::{City, CityId, NewCity};

use super::{ApiError, CityService};
use crate::config::ClientConfig;

/// City service adapter over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCityService {
    client: Client,
    base_url: Url,
    strict_status: bool,
}

impl HttpCityService {
    /// Create a new adapter from client configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build or the base URL cannot
    /// carry path segments.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        if config.api_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.api_url.to_string()));
        }

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            strict_status: config.strict_status,
        })
    }

    /// Build `{base}/{segments...}`, keeping any path already in the base.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Apply the status policy to a response.
    async fn check_status(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if self.strict_status {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        warn!(
            status = status.as_u16(),
            url = %response.url(),
            "City service returned a non-success status; continuing in lenient mode"
        );
        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let response = self.check_status(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl CityService for HttpCityService {
    #[instrument(skip(self))]
    async fn list_cities(&self) -> Result<Vec<City>, ApiError> {
        let url = self.endpoint(&["cities"])?;
        let response = self.client.get(url).send().await?;
        let cities: Vec<City> = self.read_json(response).await?;

        debug!(count = cities.len(), "Cities fetched");
        Ok(cities)
    }

    #[instrument(skip(self), fields(city_id = %id))]
    async fn get_city(&self, id: CityId) -> Result<City, ApiError> {
        let url = self.endpoint(&["cities", &id.to_string()])?;
        let response = self.client.get(url).send().await?;
        self.read_json(response).await
    }

    #[instrument(skip(self, city), fields(city_name = %city.city_name))]
    async fn create_city(&self, city: &NewCity) -> Result<City, ApiError> {
        // Trailing slash: the backend route is `/cities/`.
        let url = self.endpoint(&["cities", ""])?;
        let response = self.client.post(url).json(city).send().await?;
        let created: City = self.read_json(response).await?;

        debug!(city_id = %created.id, "City created");
        Ok(created)
    }

    #[instrument(skip(self), fields(city_id = %id))]
    async fn delete_city(&self, id: CityId) -> Result<(), ApiError> {
        let url = self.endpoint(&["cities", &id.to_string()])?;
        let response = self.client.delete(url).send().await?;
        let response = self.check_status(response).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("City was already gone");
        }
        Ok(())
    }
}
