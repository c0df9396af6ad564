//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalogue::{CatalogueClient, CatalogueError};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the catalogue client. Nothing in it is mutated per
/// request; filter state lives in each request's query string.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalogue: CatalogueClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogue HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogueError> {
        let catalogue = CatalogueClient::new(&config.catalogue)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, catalogue }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalogue API client.
    #[must_use]
    pub fn catalogue(&self) -> &CatalogueClient {
        &self.inner.catalogue
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_state_exposes_config_and_client() {
        let config = StorefrontConfig::from_lookup(&|key| match key {
            "CATALOGUE_API_URL" => Some("https://api.example.com/v1".to_string()),
            "CATALOGUE_PAGE_SIZE" => Some("36".to_string()),
            _ => None,
        })
        .unwrap();
        let state = AppState::new(config).unwrap();

        assert_eq!(state.config().catalogue.page_size, 36);
        assert_eq!(state.config().socket_addr().port(), 3000);
        assert_eq!(state.catalogue().default_page_size(), 36);
    }
}
