//! End-to-end tests of the stores over HTTP, through `AppState`.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::json;
use worldwise_client::AppError;
use worldwise_client::AppState;
use worldwise_client::auth::AuthError;
use worldwise_client::cities::{CREATE_ERROR, DELETE_ERROR, GET_ERROR, LOAD_ERROR};
use worldwise_core::CityId;
use worldwise_integration_tests::{FakeBackend, Failure, new_city, sample_cities};

async fn signed_in(backend: &FakeBackend) -> AppState {
    let state = AppState::new(backend.config()).await.unwrap();
    state.auth().login("user@email.com", "password").unwrap();
    state
}

#[tokio::test]
async fn test_initial_load_on_creation() {
    let backend = FakeBackend::start(sample_cities()).await.unwrap();
    let state = signed_in(&backend).await;

    let cities = state.cities().unwrap().state();
    assert_eq!(cities.cities, sample_cities());
    assert!(!cities.is_loading);
    assert!(cities.error.is_empty());
    assert_eq!(backend.requests(), vec!["GET /cities"]);
    assert_eq!(state.config().api_url, backend.base_url());
}

#[tokio::test]
async fn test_initial_load_failure_is_reported_in_state() {
    let backend = FakeBackend::start(sample_cities()).await.unwrap();
    backend.set_failure(Some(Failure::Garbage));
    let state = signed_in(&backend).await;

    let cities = state.cities().unwrap().state();
    assert!(cities.cities.is_empty());
    assert!(!cities.is_loading);
    assert_eq!(cities.error, LOAD_ERROR);
}

#[tokio::test]
async fn test_cities_require_login() {
    let backend = FakeBackend::start(sample_cities()).await.unwrap();
    let state = AppState::new(backend.config()).await.unwrap();

    assert!(matches!(state.cities(), Err(AppError::Unauthorized(_))));

    assert_eq!(
        state.auth().login("user@email.com", "wrong").unwrap_err(),
        AuthError::InvalidCredentials
    );
    assert!(matches!(state.cities(), Err(AppError::Unauthorized(_))));

    state.auth().login("user@email.com", "password").unwrap();
    assert_eq!(state.require_user().unwrap().name, "Jack");
    assert!(state.cities().is_ok());

    state.auth().logout();
    assert!(matches!(state.cities(), Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn test_get_city_requests_only_when_not_selected() {
    let backend = FakeBackend::start(sample_cities()).await.unwrap();
    let state = signed_in(&backend).await;
    let store = state.cities().unwrap();

    store.get_city(CityId::new(17_806_751)).await.unwrap();
    store.get_city(CityId::new(17_806_751)).await.unwrap();
    store.get_city(CityId::new(98_443_197)).await.unwrap();

    assert_eq!(
        backend.requests(),
        vec![
            "GET /cities",
            "GET /cities/17806751",
            "GET /cities/98443197",
        ]
    );
    assert_eq!(
        store.state().current_city.unwrap().city_name,
        "Berlin"
    );
}

#[tokio::test]
async fn test_get_unknown_city_sets_error() {
    let backend = FakeBackend::start(sample_cities()).await.unwrap();
    let state = signed_in(&backend).await;
    let store = state.cities().unwrap();

    let err = store.get_city(CityId::new(1)).await.unwrap_err();

    assert_eq!(err.message(), GET_ERROR);
    assert_eq!(store.state().error, GET_ERROR);
    assert!(!store.state().is_loading);
}

#[tokio::test]
async fn test_create_lisbon() {
    let backend = FakeBackend::start(sample_cities()).await.unwrap();
    let state = signed_in(&backend).await;
    let store = state.cities().unwrap();

    let created = store
        .create_city(&new_city("Lisbon", "Portugal"))
        .await
        .unwrap();

    let cities = store.state();
    assert_eq!(cities.cities.len(), 4);
    assert_eq!(cities.cities.last().unwrap().id, created.id);
    assert_eq!(cities.current_city.unwrap().id, created.id);
}

#[tokio::test]
async fn test_create_failure_sets_error_without_append() {
    let backend = FakeBackend::start(sample_cities()).await.unwrap();
    let state = signed_in(&backend).await;
    let store = state.cities().unwrap();
    backend.set_failure(Some(Failure::Garbage));

    let err = store
        .create_city(&new_city("Lisbon", "Portugal"))
        .await
        .unwrap_err();

    assert_eq!(err.message(), CREATE_ERROR);
    assert_eq!(store.state().cities.len(), 3);
    assert!(store.state().current_city.is_none());
}

#[tokio::test]
async fn test_network_failure_during_delete() {
    let mut backend = FakeBackend::start(sample_cities()).await.unwrap();
    let state = signed_in(&backend).await;
    let store = state.cities().unwrap();
    backend.stop().await;

    let err = store.delete_city(CityId::new(17_806_751)).await.unwrap_err();

    let cities = store.state();
    assert_eq!(err.message(), DELETE_ERROR);
    assert_eq!(cities.cities, sample_cities());
    assert_eq!(cities.error, DELETE_ERROR);
    assert!(!cities.is_loading);
}

#[tokio::test]
async fn test_strict_delete_failure_keeps_cache() {
    let backend = FakeBackend::start(sample_cities()).await.unwrap();
    let state = AppState::new(backend.strict_config()).await.unwrap();
    state.auth().login("user@email.com", "password").unwrap();
    let store = state.cities().unwrap();
    backend.set_failure(Some(Failure::Respond(StatusCode::BAD_GATEWAY, json!({}))));

    assert!(store.delete_city(CityId::new(73_930_385)).await.is_err());
    assert_eq!(store.state().cities.len(), 3);
    assert_eq!(store.state().error, DELETE_ERROR);
}

#[tokio::test]
async fn test_cache_converges_with_backend() {
    let backend = FakeBackend::start(sample_cities()).await.unwrap();
    let state = signed_in(&backend).await;
    let store = state.cities().unwrap();

    let porto = store
        .create_city(&new_city("Porto", "Portugal"))
        .await
        .unwrap();
    store.delete_city(CityId::new(17_806_751)).await.unwrap();
    store
        .create_city(&new_city("Paris", "France"))
        .await
        .unwrap();
    store.delete_city(porto.id).await.unwrap();

    assert_eq!(store.state().cities, backend.cities());

    let fresh = signed_in(&backend).await;
    assert_eq!(
        fresh.cities().unwrap().state().cities,
        store.state().cities
    );
}

#[tokio::test]
async fn test_error_cleared_by_next_success() {
    let backend = FakeBackend::start(sample_cities()).await.unwrap();
    let state = signed_in(&backend).await;
    let store = state.cities().unwrap();

    backend.set_failure(Some(Failure::Garbage));
    assert!(store.load_all().await.is_err());
    assert_eq!(store.state().error, LOAD_ERROR);

    backend.set_failure(None);
    store.load_all().await.unwrap();
    assert!(store.state().error.is_empty());
    assert_eq!(store.state().cities.len(), 3);
}
