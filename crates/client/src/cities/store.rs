//! Cities store: the only path from the front end to the city service.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};
use worldwise_core::{City, CityId, NewCity};

use super::reducer::{CREATE_ERROR, DELETE_ERROR, GET_ERROR, LOAD_ERROR, reduce};
use super::{CitiesAction, CitiesState};
use crate::api::{ApiError, CityService};

/// A failed store operation.
///
/// `message` is the same text the store publishes in
/// [`CitiesState::error`]; `source` is the underlying service error.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CitiesError {
    message: &'static str,
    #[source]
    source: ApiError,
}

impl CitiesError {
    /// User-facing message for the failed operation.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.message
    }
}

/// Cheaply cloneable handle over the cities state.
///
/// Every operation dispatches [`CitiesAction`]s through [`reduce`] and
/// publishes the result to subscribers. Operations are not coordinated with
/// each other: when two overlap, whichever response arrives last wins.
#[derive(Clone)]
pub struct CitiesStore {
    inner: Arc<CitiesStoreInner>,
}

struct CitiesStoreInner {
    service: Arc<dyn CityService>,
    state: watch::Sender<CitiesState>,
}

impl std::fmt::Debug for CitiesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CitiesStore")
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

impl CitiesStore {
    /// Create a store with an empty cache. Nothing is fetched.
    #[must_use]
    pub fn new(service: Arc<dyn CityService>) -> Self {
        let (state, _) = watch::channel(CitiesState::default());
        Self {
            inner: Arc::new(CitiesStoreInner { service, state }),
        }
    }

    /// Create a store and run the initial [`load_all`](Self::load_all).
    ///
    /// A failed load does not fail construction; it is reported through
    /// [`CitiesState::error`] like any other operation.
    pub async fn open(service: Arc<dyn CityService>) -> Self {
        let store = Self::new(service);
        // Failure is already logged and published in state.
        let _ = store.load_all().await;
        store
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> CitiesState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified after every dispatched action.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CitiesState> {
        self.inner.state.subscribe()
    }

    fn dispatch(&self, action: CitiesAction) {
        debug!(action = action.kind(), "Dispatching cities action");
        self.inner.state.send_modify(|state| {
            let current = std::mem::take(state);
            *state = reduce(current, action);
        });
    }

    fn reject(&self, message: &'static str, source: ApiError) -> CitiesError {
        warn!(error = %source, "{message}");
        self.dispatch(CitiesAction::Rejected(message.to_string()));
        CitiesError { message, source }
    }

    /// Replace the cache with the backend's full list. No retry.
    ///
    /// # Errors
    ///
    /// Returns [`CitiesError`] if the list cannot be fetched or decoded.
    #[instrument(skip(self))]
    pub async fn load_all(&self) -> Result<(), CitiesError> {
        self.dispatch(CitiesAction::Loading);

        match self.inner.service.list_cities().await {
            Ok(cities) => {
                self.dispatch(CitiesAction::CitiesLoaded(cities));
                Ok(())
            }
            Err(e) => Err(self.reject(LOAD_ERROR, e)),
        }
    }

    /// Select a city, fetching it unless it is already the current one.
    ///
    /// Returns `Ok(false)` when the one-slot cache answered and no request
    /// was made, `Ok(true)` after a fetch.
    ///
    /// # Errors
    ///
    /// Returns [`CitiesError`] if the city cannot be fetched or decoded.
    #[instrument(skip(self), fields(city_id = %id))]
    pub async fn get_city(&self, id: CityId) -> Result<bool, CitiesError> {
        if self.inner.state.borrow().cached(id).is_some() {
            debug!("City already selected");
            return Ok(false);
        }

        self.dispatch(CitiesAction::Loading);

        match self.inner.service.get_city(id).await {
            Ok(city) => {
                self.dispatch(CitiesAction::CityLoaded(city));
                Ok(true)
            }
            Err(e) => Err(self.reject(GET_ERROR, e)),
        }
    }

    /// Store a new city; on success it is appended and selected.
    ///
    /// # Errors
    ///
    /// Returns [`CitiesError`] if the backend rejects or garbles the request.
    #[instrument(skip(self, new_city), fields(city_name = %new_city.city_name))]
    pub async fn create_city(&self, new_city: &NewCity) -> Result<City, CitiesError> {
        self.dispatch(CitiesAction::Loading);

        match self.inner.service.create_city(new_city).await {
            Ok(city) => {
                self.dispatch(CitiesAction::CityCreated(city.clone()));
                Ok(city)
            }
            Err(e) => Err(self.reject(CREATE_ERROR, e)),
        }
    }

    /// Delete a city; on success it leaves the cache and the selection is
    /// cleared, whichever city was selected.
    ///
    /// # Errors
    ///
    /// Returns [`CitiesError`] if the request fails.
    #[instrument(skip(self), fields(city_id = %id))]
    pub async fn delete_city(&self, id: CityId) -> Result<(), CitiesError> {
        self.dispatch(CitiesAction::Loading);

        match self.inner.service.delete_city(id).await {
            Ok(()) => {
                self.dispatch(CitiesAction::CityDeleted(id));
                Ok(())
            }
            Err(e) => Err(self.reject(DELETE_ERROR, e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use tokio::sync::oneshot;
    use worldwise_core::Position;

    use super::*;

    /// In-memory city service with call counters and a failure switch.
    #[derive(Default)]
    struct FakeCityService {
        cities: Mutex<Vec<City>>,
        next_id: AtomicUsize,
        get_calls: AtomicUsize,
        failing: AtomicBool,
    }

    impl FakeCityService {
        fn with_cities(cities: Vec<City>) -> Arc<Self> {
            let next = cities.iter().map(|c| c.id.as_i64()).max().unwrap_or(0);
            let fake = Self::default();
            *fake.cities.lock().unwrap() = cities;
            fake.next_id
                .store(usize::try_from(next).unwrap() + 1, Ordering::SeqCst);
            Arc::new(fake)
        }

        fn fail(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), ApiError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(ApiError::Status {
                    status: 503,
                    message: "service unavailable".to_string(),
                });
            }
            Ok(())
        }

        fn snapshot(&self) -> Vec<City> {
            self.cities.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CityService for FakeCityService {
        async fn list_cities(&self) -> Result<Vec<City>, ApiError> {
            self.check()?;
            Ok(self.snapshot())
        }

        async fn get_city(&self, id: CityId) -> Result<City, ApiError> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            self.snapshot()
                .into_iter()
                .find(|c| c.id == id)
                .ok_or_else(|| ApiError::Status {
                    status: 404,
                    message: "Not Found".to_string(),
                })
        }

        async fn create_city(&self, city: &NewCity) -> Result<City, ApiError> {
            self.check()?;
            let id = i64::try_from(self.next_id.fetch_add(1, Ordering::SeqCst)).unwrap();
            let created = city.clone().into_city(CityId::new(id));
            self.cities.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn delete_city(&self, id: CityId) -> Result<(), ApiError> {
            self.check()?;
            self.cities.lock().unwrap().retain(|c| c.id != id);
            Ok(())
        }
    }

    fn new_city(name: &str) -> NewCity {
        NewCity {
            city_name: name.to_string(),
            country: "Portugal".to_string(),
            emoji: "🇵🇹".to_string(),
            date: Utc.with_ymd_and_hms(2027, 10, 31, 15, 59, 59).unwrap(),
            notes: None,
            position: Position::new(38.72, -9.14).unwrap(),
        }
    }

    fn city(id: i64, name: &str) -> City {
        new_city(name).into_city(CityId::new(id))
    }

    fn three_cities() -> Vec<City> {
        vec![city(1, "Lisbon"), city(2, "Porto"), city(3, "Braga")]
    }

    #[tokio::test]
    async fn test_open_loads_in_server_order() {
        let fake = FakeCityService::with_cities(three_cities());
        let store = CitiesStore::open(fake).await;

        let state = store.state();
        assert_eq!(state.cities, three_cities());
        assert!(!state.is_loading);
        assert!(state.error.is_empty());
    }

    #[tokio::test]
    async fn test_open_failure_sets_load_error() {
        let fake = FakeCityService::with_cities(three_cities());
        fake.fail(true);
        let store = CitiesStore::open(fake).await;

        let state = store.state();
        assert!(state.cities.is_empty());
        assert!(!state.is_loading);
        assert_eq!(state.error, LOAD_ERROR);
    }

    #[tokio::test]
    async fn test_get_city_short_circuits_on_selected_id() {
        let fake = FakeCityService::with_cities(three_cities());
        let store = CitiesStore::open(fake.clone()).await;

        assert!(store.get_city(CityId::new(2)).await.unwrap());
        assert_eq!(fake.get_calls.load(Ordering::SeqCst), 1);

        let before = store.state();
        assert!(!store.get_city(CityId::new(2)).await.unwrap());
        assert_eq!(fake.get_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.state(), before);

        assert!(store.get_city(CityId::new(3)).await.unwrap());
        assert_eq!(fake.get_calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.state().current_city.unwrap().id, CityId::new(3));
    }

    #[tokio::test]
    async fn test_get_city_failure() {
        let fake = FakeCityService::with_cities(three_cities());
        let store = CitiesStore::open(fake).await;

        let err = store.get_city(CityId::new(99)).await.unwrap_err();
        assert_eq!(err.message(), GET_ERROR);
        assert_eq!(store.state().error, GET_ERROR);
        assert!(store.state().current_city.is_none());
    }

    #[tokio::test]
    async fn test_create_appends_server_record_and_selects_it() {
        let fake = FakeCityService::with_cities(vec![city(6, "Faro")]);
        let store = CitiesStore::open(fake).await;

        let created = store.create_city(&new_city("Lisbon")).await.unwrap();
        assert_eq!(created.id, CityId::new(7));

        let state = store.state();
        assert_eq!(state.cities.len(), 2);
        assert_eq!(state.cities.last().unwrap().id, CityId::new(7));
        assert_eq!(state.current_city.unwrap().id, CityId::new(7));
    }

    #[tokio::test]
    async fn test_delete_failure_leaves_cache() {
        let fake = FakeCityService::with_cities(three_cities());
        let store = CitiesStore::open(fake.clone()).await;
        fake.fail(true);

        let err = store.delete_city(CityId::new(3)).await.unwrap_err();
        assert_eq!(err.message(), DELETE_ERROR);

        let state = store.state();
        assert_eq!(state.cities, three_cities());
        assert_eq!(state.error, DELETE_ERROR);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_delete_clears_selection_even_for_other_city() {
        let fake = FakeCityService::with_cities(three_cities());
        let store = CitiesStore::open(fake).await;
        store.get_city(CityId::new(1)).await.unwrap();

        store.delete_city(CityId::new(2)).await.unwrap();

        let state = store.state();
        assert_eq!(state.cities.len(), 2);
        assert!(state.find(CityId::new(2)).is_none());
        assert!(state.current_city.is_none());
    }

    #[tokio::test]
    async fn test_replayed_mutations_match_fresh_load() {
        let fake = FakeCityService::with_cities(three_cities());
        let store = CitiesStore::open(fake.clone()).await;

        store.create_city(&new_city("Coimbra")).await.unwrap();
        store.delete_city(CityId::new(1)).await.unwrap();
        store.create_city(&new_city("Évora")).await.unwrap();
        store.delete_city(CityId::new(4)).await.unwrap();

        let fresh = CitiesStore::open(fake).await;
        assert_eq!(store.state().cities, fresh.state().cities);
    }

    #[tokio::test]
    async fn test_subscribers_see_each_change() {
        let fake = FakeCityService::with_cities(three_cities());
        let store = CitiesStore::new(fake);
        let mut rx = store.subscribe();

        store.load_all().await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().cities.len(), 3);
    }

    /// Serves `get_city` only once the test releases that id's gate.
    struct GatedCityService {
        cities: Vec<City>,
        gates: Mutex<HashMap<CityId, oneshot::Receiver<()>>>,
    }

    impl GatedCityService {
        fn new(cities: Vec<City>) -> (Arc<Self>, HashMap<CityId, oneshot::Sender<()>>) {
            let mut senders = HashMap::new();
            let mut gates = HashMap::new();
            for city in &cities {
                let (tx, rx) = oneshot::channel();
                senders.insert(city.id, tx);
                gates.insert(city.id, rx);
            }
            let service = Arc::new(Self {
                cities,
                gates: Mutex::new(gates),
            });
            (service, senders)
        }
    }

    #[async_trait]
    impl CityService for GatedCityService {
        async fn list_cities(&self) -> Result<Vec<City>, ApiError> {
            Ok(self.cities.clone())
        }

        async fn get_city(&self, id: CityId) -> Result<City, ApiError> {
            let gate = self.gates.lock().unwrap().remove(&id);
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.cities
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .ok_or_else(|| ApiError::Status {
                    status: 404,
                    message: "Not Found".to_string(),
                })
        }

        async fn create_city(&self, _city: &NewCity) -> Result<City, ApiError> {
            Err(ApiError::InvalidUrl("read-only".to_string()))
        }

        async fn delete_city(&self, _id: CityId) -> Result<(), ApiError> {
            Err(ApiError::InvalidUrl("read-only".to_string()))
        }
    }

    #[tokio::test]
    async fn test_overlapping_gets_last_arrival_wins() {
        let (service, mut gates) = GatedCityService::new(three_cities());
        let store = CitiesStore::new(service);

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.get_city(CityId::new(1)).await }
        });
        let second = tokio::spawn({
            let store = store.clone();
            async move { store.get_city(CityId::new(2)).await }
        });

        gates.remove(&CityId::new(2)).unwrap().send(()).unwrap();
        assert!(second.await.unwrap().unwrap());
        assert_eq!(
            store.state().current_city.map(|c| c.id),
            Some(CityId::new(2))
        );

        gates.remove(&CityId::new(1)).unwrap().send(()).unwrap();
        assert!(first.await.unwrap().unwrap());

        let state = store.state();
        assert_eq!(state.current_city.map(|c| c.id), Some(CityId::new(1)));
        assert!(!state.is_loading);
        assert!(state.error.is_empty());
    }
}
