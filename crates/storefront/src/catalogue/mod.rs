//! Catalogue API client.
//!
//! # Architecture
//!
//! - One `GET {api_url}/categories/{id}?page=&pageSize=` per category view
//! - The marketplace backend is the source of truth; nothing is persisted
//! - Converted pages (facets included) are cached in memory via `moka`
//! - No retries: failures surface to the caller, which shows an error state
//!
//! # Example
//!
//! ```rust,ignore
//! use atelier_storefront::catalogue::CatalogueClient;
//!
//! let client = CatalogueClient::new(&config.catalogue)?;
//! let page = client.fetch_category(CategoryId::new(12), 1, 24).await?;
//! let visible = filters.apply(&page.products);
//! ```

mod cache;
mod conversions;
pub mod wire;

use std::sync::Arc;

use atelier_core::{CategoryId, CategoryPage};
use moka::future::Cache;
use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::CatalogueConfig;

use cache::CacheKey;

const USER_AGENT: &str = concat!("atelier-storefront/", env!("CARGO_PKG_VERSION"));
const MAX_CACHED_PAGES: u64 = 1000;
/// Characters of an error body kept for logs and error messages.
const ERROR_BODY_LIMIT: usize = 200;

/// Errors that can occur when fetching from the catalogue API.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The category does not exist.
    #[error("Category not found: {0}")]
    NotFound(CategoryId),

    /// Rate limited by the catalogue API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success response.
    #[error("Catalogue API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body is not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A record parsed but cannot be used (e.g., unsupported currency).
    #[error("Invalid catalogue record: {0}")]
    Invalid(String),

    /// The configured base URL cannot carry a path.
    #[error("Invalid catalogue base URL: {0}")]
    InvalidBaseUrl(String),
}

// =============================================================================
// CatalogueClient
// =============================================================================

/// Client for the marketplace catalogue API.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CatalogueClient {
    inner: Arc<CatalogueClientInner>,
}

struct CatalogueClientInner {
    client: reqwest::Client,
    base_url: Url,
    api_token: Option<SecretString>,
    page_size: u32,
    cache: Option<Cache<CacheKey, Arc<CategoryPage>>>,
}

impl CatalogueClient {
    /// Create a new catalogue API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &CatalogueConfig) -> Result<Self, CatalogueError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let cache = config.cache_ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(MAX_CACHED_PAGES)
                .time_to_live(ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(CatalogueClientInner {
                client,
                base_url: config.api_url.clone(),
                api_token: config.api_token.clone(),
                page_size: config.page_size,
                cache,
            }),
        })
    }

    /// Page size used when the caller has no preference.
    #[must_use]
    pub fn default_page_size(&self) -> u32 {
        self.inner.page_size
    }

    /// Fetch one page of a category with its facets.
    ///
    /// # Errors
    ///
    /// Returns `CatalogueError::NotFound` for an unknown category and another
    /// `CatalogueError` for any transport, status or decoding failure.
    #[instrument(skip(self), fields(category = %id))]
    pub async fn fetch_category(
        &self,
        id: CategoryId,
        page: u32,
        page_size: u32,
    ) -> Result<Arc<CategoryPage>, CatalogueError> {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let key = CacheKey {
            category: id,
            page,
            page_size,
        };

        if let Some(cache) = &self.inner.cache
            && let Some(cached) = cache.get(&key).await
        {
            debug!("Cache hit for category page");
            return Ok(cached);
        }

        let url = self.category_url(id, page, page_size)?;
        let mut request = self.inner.client.get(url).header(ACCEPT, "application/json");
        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogueError::NotFound(id));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogueError::RateLimited(retry_after));
        }

        // Body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&body, 500),
                "Catalogue API returned non-success status"
            );
            return Err(CatalogueError::Status {
                status: status.as_u16(),
                body: truncate(&body, ERROR_BODY_LIMIT),
            });
        }

        let payload: wire::CategoryResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&body, 500),
                "Failed to parse catalogue response"
            );
            CatalogueError::Parse(e)
        })?;

        let category_page = Arc::new(conversions::convert_category_page(
            payload, page, page_size,
        )?);
        debug!(
            products = category_page.products.len(),
            "Fetched category page"
        );

        if let Some(cache) = &self.inner.cache {
            cache.insert(key, Arc::clone(&category_page)).await;
        }

        Ok(category_page)
    }

    /// Build `{base}/categories/{id}?page={page}&pageSize={page_size}`.
    fn category_url(&self, id: CategoryId, page: u32, page_size: u32) -> Result<Url, CatalogueError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogueError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .push("categories")
            .push(&id.to_string());
        url.query_pairs_mut()
            .clear()
            .append_pair("page", &page.to_string())
            .append_pair("pageSize", &page_size.to_string());
        Ok(url)
    }
}

fn truncate(body: &str, limit: usize) -> String {
    body.chars().take(limit).collect()
}
