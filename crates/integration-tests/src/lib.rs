//! Integration tests for Atelier.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p atelier-integration-tests
//! ```
//!
//! No external services are needed: [`MockCatalogue`] serves canned category
//! responses on `127.0.0.1:0` and the storefront under test points at it.
//!
//! # Test Categories
//!
//! - `catalogue_client` - fetch, error mapping and caching against the mock
//! - `storefront_routes` - HTML and JSON category routes end to end

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use atelier_storefront::config::{CatalogueConfig, StorefrontConfig};
use atelier_storefront::state::AppState;
use axum::{
    Json, Router,
    extract::{Path, RawQuery, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use url::Url;

/// Category with two subcategories and two products.
pub const DRESSES: i64 = 10;
/// Subcategory of [`DRESSES`] holding the cheaper product.
pub const MAXI: i64 = 11;
/// Subcategory of [`DRESSES`] holding the pricier product.
pub const MINI: i64 = 12;
/// Leaf category with no products.
pub const EMPTY: i64 = 20;
/// Category whose products arrive out of creation order with view ties.
pub const TIES: i64 = 30;
/// Unknown to the backend: 404.
pub const MISSING: i64 = 404;
/// Backend failure: 500.
pub const BROKEN: i64 = 500;
/// Rate limited: 429 with `Retry-After: 7`.
pub const LIMITED: i64 = 429;
/// 200 with a body that is not JSON.
pub const GARBLED: i64 = 777;
/// 200 with a product priced in an unknown currency.
pub const BAD_CURRENCY: i64 = 778;

/// Canned catalogue backend served over real HTTP.
pub struct MockCatalogue {
    pub base_url: Url,
    shared: MockState,
}

#[derive(Clone, Default)]
struct MockState {
    hits: Arc<AtomicUsize>,
    last_query: Arc<Mutex<Option<String>>>,
}

impl MockCatalogue {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let shared = MockState::default();
        let app = Router::new()
            .route("/v1/categories/{id}", get(category))
            .with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock catalogue");
        let addr = listener
            .local_addr()
            .expect("Mock catalogue has no local address");
        tokio::spawn(async move { axum::serve(listener, app).await });

        let base_url = Url::parse(&format!("http://{addr}/v1")).expect("Invalid mock URL");
        Self { base_url, shared }
    }

    /// Number of requests the backend has answered.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.shared.hits.load(Ordering::SeqCst)
    }

    /// Raw query string of the most recent request.
    #[must_use]
    pub fn last_query(&self) -> Option<String> {
        self.shared
            .last_query
            .lock()
            .ok()
            .and_then(|query| query.clone())
    }

    /// Client settings pointing at this backend.
    #[must_use]
    pub fn catalogue_config(&self, cache_ttl: Option<Duration>) -> CatalogueConfig {
        CatalogueConfig {
            api_url: self.base_url.clone(),
            api_token: None,
            page_size: 24,
            timeout: Duration::from_secs(5),
            cache_ttl,
        }
    }

    /// Storefront state pointing at this backend, cache disabled.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is rejected.
    #[must_use]
    pub fn app_state(&self) -> AppState {
        let api_url = self.base_url.to_string();
        let config = StorefrontConfig::from_lookup(&|key| match key {
            "CATALOGUE_API_URL" => Some(api_url.clone()),
            "CATALOGUE_CACHE_TTL_SECS" => Some("0".to_string()),
            _ => None,
        })
        .expect("Invalid storefront configuration");
        AppState::new(config).expect("Failed to build storefront state")
    }
}

async fn category(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    RawQuery(query): RawQuery,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if let Ok(mut last) = state.last_query.lock() {
        *last = query;
    }

    match id {
        DRESSES => Json(dresses()).into_response(),
        MAXI => Json(json!({
            "category": {"id": MAXI, "name": "Maxi", "parentId": DRESSES, "productCount": 1},
            "products": [dresses()["products"][0].clone()]
        }))
        .into_response(),
        EMPTY => Json(json!({
            "category": {"id": EMPTY, "name": "Jumpsuits", "productCount": 0},
            "products": []
        }))
        .into_response(),
        TIES => Json(ties()).into_response(),
        BROKEN => (StatusCode::INTERNAL_SERVER_ERROR, "database exploded").into_response(),
        LIMITED => (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, "7")],
            "slow down",
        )
            .into_response(),
        GARBLED => (
            [(header::CONTENT_TYPE, "application/json")],
            "<html>maintenance</html>",
        )
            .into_response(),
        BAD_CURRENCY => Json(json!({
            "category": {"id": BAD_CURRENCY, "name": "Imports", "productCount": 1},
            "products": [product(90, "Silk scarf", json!("30.00"), "XYZ", MAXI)]
        }))
        .into_response(),
        _ => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

fn product(id: i64, name: &str, price: Value, currency: &str, category_id: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "price": price,
        "currency": currency,
        "images": [format!("https://cdn.example.com/products/{id}.jpg")],
        "createdAt": "2026-03-01T10:00:00Z",
        "categoryId": category_id
    })
}

/// Two dresses: 50 EUR in M/L red, 150 EUR in S black, newest last.
#[must_use]
pub fn dresses() -> Value {
    let mut cheap = product(1, "Wrap dress", json!("50.00"), "EUR", MAXI);
    cheap["sizes"] = json!(["M", "L"]);
    cheap["colors"] = json!(["RED"]);
    cheap["tags"] = json!(["linen", "summer"]);
    cheap["viewCount"] = json!(40);
    cheap["seller"] = json!({"id": 7, "shopName": "studio-lune", "displayName": "Studio Lune"});

    let mut pricey = product(2, "Slip dress", json!(150), "EUR", MINI);
    pricey["sizes"] = json!(["S"]);
    pricey["colors"] = json!(["black"]);
    pricey["tags"] = json!(["silk"]);
    pricey["viewCount"] = json!(12);
    pricey["createdAt"] = json!("2026-03-05T10:00:00Z");
    pricey["seller"] = json!({"id": 8, "shopName": "maison-ora"});

    json!({
        "category": {
            "id": DRESSES,
            "name": "Dresses",
            "slug": "dresses",
            "productCount": 30,
            "children": [
                {"id": MAXI, "name": "Maxi", "parentId": DRESSES, "productCount": 1},
                {"id": MINI, "name": "Mini", "parentId": DRESSES, "productCount": 1}
            ]
        },
        "products": [cheap, pricey]
    })
}

/// Three products with equal view counts, listed oldest first.
#[must_use]
pub fn ties() -> Value {
    let mut first = product(31, "Knit top", json!("20.00"), "EUR", TIES);
    first["viewCount"] = json!(5);
    first["createdAt"] = json!("2026-01-01T00:00:00Z");
    let mut second = product(32, "Knit cardigan", json!("45.00"), "EUR", TIES);
    second["viewCount"] = json!(5);
    second["createdAt"] = json!("2026-01-02T00:00:00Z");
    let mut third = product(33, "Knit vest", json!("30.00"), "EUR", TIES);
    third["viewCount"] = json!(9);
    third["createdAt"] = json!("2026-01-03T00:00:00Z");

    json!({
        "category": {"id": TIES, "name": "Knitwear", "productCount": 3},
        "products": [first, second, third]
    })
}

/// Serve the storefront on an ephemeral port and return its base URL.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn spawn_storefront(state: AppState) -> String {
    let app = atelier_storefront::app(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind storefront");
    let addr = listener
        .local_addr()
        .expect("Storefront has no local address");
    tokio::spawn(async move { axum::serve(listener, app).await });
    format!("http://{addr}")
}
