//! CLI command implementations.

pub mod browse;
pub mod facets;

use atelier_storefront::catalogue::{CatalogueClient, CatalogueError};
use atelier_storefront::config::{CatalogueConfig, ConfigError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The catalogue API request failed.
    #[error("{0}")]
    Catalogue(#[from] CatalogueError),

    /// Writing to stdout failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Build a catalogue client from the environment.
fn catalogue_client() -> Result<CatalogueClient, CommandError> {
    let config = CatalogueConfig::from_env()?;
    tracing::debug!(api_url = %config.api_url, "Using catalogue API");
    Ok(CatalogueClient::new(&config)?)
}
