//! Integration test support for WorldWise.
//!
//! Provides [`FakeBackend`], an in-process `axum` server speaking the same
//! REST contract as the JSON city service:
//!
//! - `GET /cities`, `GET /cities/{id}`
//! - `POST /cities/` (and `/cities`)
//! - `DELETE /cities/{id}`
//!
//! Tests point a [`ClientConfig`] at it, inject failures, and inspect the
//! requests it received.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p worldwise-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;
use worldwise_client::ClientConfig;
use worldwise_core::{City, CityId, NewCity, Position};

/// A response the fake returns instead of doing its job.
#[derive(Debug, Clone)]
pub enum Failure {
    /// Respond with this status and JSON body.
    Respond(StatusCode, Value),
    /// Respond 200 with a body that is not JSON.
    Garbage,
}

#[derive(Debug, Default)]
struct BackendState {
    cities: Vec<City>,
    next_id: i64,
    failure: Option<Failure>,
    requests: Vec<String>,
    content_types: Vec<String>,
}

type Shared = Arc<Mutex<BackendState>>;

fn lock(shared: &Shared) -> MutexGuard<'_, BackendState> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process fake of the city service.
pub struct FakeBackend {
    addr: SocketAddr,
    state: Shared,
    server: JoinHandle<()>,
}

impl FakeBackend {
    /// Start serving `cities` on an ephemeral local port.
    ///
    /// # Errors
    ///
    /// Returns error if the listener cannot be bound.
    pub async fn start(cities: Vec<City>) -> std::io::Result<Self> {
        let next_id = cities.iter().map(|c| c.id.as_i64()).max().unwrap_or(0) + 1;
        let state: Shared = Arc::new(Mutex::new(BackendState {
            cities,
            next_id,
            ..BackendState::default()
        }));

        let app = Router::new()
            .route("/cities", get(list_cities).post(create_city))
            .route("/cities/", post(create_city))
            .route("/cities/{id}", get(get_city).delete(delete_city))
            .layer(middleware::map_response(close_connection))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Fake backend stopped");
            }
        });

        Ok(Self {
            addr,
            state,
            server,
        })
    }

    /// Base URL of the fake.
    ///
    /// # Panics
    ///
    /// Panics if the local address does not form a URL (it always does).
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("local address is a valid URL")
    }

    /// Lenient client configuration pointing at the fake.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url())
    }

    /// Strict client configuration pointing at the fake.
    #[must_use]
    pub fn strict_config(&self) -> ClientConfig {
        ClientConfig {
            strict_status: true,
            ..self.config()
        }
    }

    /// Records currently stored, in backend order.
    #[must_use]
    pub fn cities(&self) -> Vec<City> {
        lock(&self.state).cities.clone()
    }

    /// Every request received so far, as `"METHOD /path"`.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        lock(&self.state).requests.clone()
    }

    /// `Content-Type` headers of the create requests received so far.
    #[must_use]
    pub fn content_types(&self) -> Vec<String> {
        lock(&self.state).content_types.clone()
    }

    /// Make every following request fail, or clear the failure with `None`.
    pub fn set_failure(&self, failure: Option<Failure>) {
        lock(&self.state).failure = failure;
    }

    /// Stop serving; subsequent requests fail to connect.
    pub async fn stop(&mut self) {
        self.server.abort();
        let _ = (&mut self.server).await;
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// No keep-alive, so a stopped fake refuses every later request.
async fn close_connection(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));
    response
}

fn record(state: &mut BackendState, method: &str, path: &str) -> Option<Response> {
    state.requests.push(format!("{method} {path}"));
    state.failure.clone().map(|failure| match failure {
        Failure::Respond(status, body) => (status, Json(body)).into_response(),
        Failure::Garbage => (StatusCode::OK, "<html>not json</html>").into_response(),
    })
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({}))).into_response()
}

async fn list_cities(State(shared): State<Shared>) -> Response {
    let mut state = lock(&shared);
    if let Some(forced) = record(&mut state, "GET", "/cities") {
        return forced;
    }
    Json(state.cities.clone()).into_response()
}

async fn get_city(State(shared): State<Shared>, Path(id): Path<String>) -> Response {
    let mut state = lock(&shared);
    if let Some(forced) = record(&mut state, "GET", &format!("/cities/{id}")) {
        return forced;
    }
    let Ok(id) = id.parse::<CityId>() else {
        return not_found();
    };
    state
        .cities
        .iter()
        .find(|c| c.id == id)
        .map_or_else(not_found, |city| Json(city.clone()).into_response())
}

async fn create_city(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(new_city): Json<NewCity>,
) -> Response {
    let mut state = lock(&shared);
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        let content_type = content_type.to_str().unwrap_or_default().to_string();
        state.content_types.push(content_type);
    }
    if let Some(forced) = record(&mut state, "POST", "/cities/") {
        return forced;
    }

    let id = CityId::new(state.next_id);
    state.next_id += 1;
    let city = new_city.into_city(id);
    state.cities.push(city.clone());
    (StatusCode::CREATED, Json(city)).into_response()
}

async fn delete_city(State(shared): State<Shared>, Path(id): Path<String>) -> Response {
    let mut state = lock(&shared);
    if let Some(forced) = record(&mut state, "DELETE", &format!("/cities/{id}")) {
        return forced;
    }
    let Ok(id) = id.parse::<CityId>() else {
        return not_found();
    };
    let before = state.cities.len();
    state.cities.retain(|c| c.id != id);
    if state.cities.len() == before {
        return not_found();
    }
    Json(json!({})).into_response()
}

// =============================================================================
// Fixtures
// =============================================================================

fn fixture(
    id: i64,
    name: &str,
    (country, emoji): (&str, &str),
    (year, month, day): (i32, u32, u32),
    (lat, lng): (f64, f64),
) -> City {
    City {
        id: CityId::new(id),
        city_name: name.to_string(),
        country: country.to_string(),
        emoji: emoji.to_string(),
        date: Utc
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now),
        notes: None,
        position: Position { lat, lng },
    }
}

/// Three cities in backend order: Lisbon, Madrid, Berlin.
#[must_use]
pub fn sample_cities() -> Vec<City> {
    vec![
        City {
            notes: Some("My favorite city so far!".to_string()),
            ..fixture(
                73_930_385,
                "Lisbon",
                ("Portugal", "🇵🇹"),
                (2027, 10, 31),
                (38.727_881, -9.140_900),
            )
        },
        fixture(
            17_806_751,
            "Madrid",
            ("Spain", "🇪🇸"),
            (2027, 7, 15),
            (40.460_560, -3.677_062),
        ),
        fixture(
            98_443_197,
            "Berlin",
            ("Germany", "🇩🇪"),
            (2027, 2, 12),
            (52.536_846, 13.381_049),
        ),
    ]
}

/// A new city ready to be created.
#[must_use]
pub fn new_city(name: &str, country: &str) -> NewCity {
    NewCity {
        city_name: name.to_string(),
        country: country.to_string(),
        emoji: String::new(),
        date: Utc::now(),
        notes: None,
        position: Position {
            lat: 38.7,
            lng: -9.1,
        },
    }
}
