//! Application state shared by a front end.

use std::sync::Arc;

use tracing::info;

use crate::api::{CityService, HttpCityService};
use crate::auth::{AuthStore, Credential, User};
use crate::cities::CitiesStore;
use crate::config::ClientConfig;
use crate::error::{AppError, Result};

/// Both stores, constructed once per session and handed to consumers.
///
/// This struct is cheaply cloneable via `Arc`. The cities store is only
/// reachable through [`cities`](Self::cities), which requires a signed-in
/// user.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: ClientConfig,
    auth: AuthStore,
    cities: CitiesStore,
}

impl AppState {
    /// Build the state against the configured HTTP city service, using the
    /// demo credential, and run the initial city load.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub async fn new(config: ClientConfig) -> Result<Self> {
        let service = HttpCityService::new(&config)?;
        let credential = Credential::demo().map_err(crate::auth::AuthError::from)?;
        Ok(Self::with_service(config, Arc::new(service), credential).await)
    }

    /// Build the state over any city service.
    pub async fn with_service(
        config: ClientConfig,
        service: Arc<dyn CityService>,
        credential: Credential,
    ) -> Self {
        let auth = AuthStore::new(credential);
        let cities = CitiesStore::open(service).await;
        info!(
            api_url = %config.api_url,
            cities = cities.state().cities.len(),
            "Application state ready"
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                cities,
            }),
        }
    }

    /// Get the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get the auth store.
    #[must_use]
    pub fn auth(&self) -> &AuthStore {
        &self.inner.auth
    }

    /// The signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` when nobody is signed in.
    pub fn require_user(&self) -> Result<User> {
        self.inner
            .auth
            .user()
            .ok_or_else(|| AppError::Unauthorized("login required".to_string()))
    }

    /// Get the cities store, if someone is signed in.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` when nobody is signed in.
    pub fn cities(&self) -> Result<&CitiesStore> {
        self.require_user()?;
        Ok(&self.inner.cities)
    }
}
