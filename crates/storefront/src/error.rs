//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. JSON route handlers return `Result<T, AppError>`;
//! HTML handlers render their own error pages but log the same way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::catalogue::CatalogueError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalogue API operation failed.
    #[error("Catalogue error: {0}")]
    Catalogue(#[from] CatalogueError),
}

impl AppError {
    /// HTTP status reported to the client.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Catalogue(CatalogueError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Catalogue(CatalogueError::RateLimited(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Catalogue(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Whether the error is our (or the backend's) fault rather than the client's.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }

    /// Message safe to show to clients.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Catalogue(CatalogueError::NotFound(id)) => format!("Category {id} not found"),
            Self::Catalogue(CatalogueError::RateLimited(_)) => {
                "Catalogue temporarily unavailable".to_string()
            }
            Self::Catalogue(_) => "External service error".to_string(),
        }
    }

    /// Capture server-side errors to Sentry and log them.
    pub fn report(&self) {
        if self.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.report();

        // Don't expose internal error details to clients
        (self.status(), self.public_message()).into_response()
    }
}

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("navigation", "Viewed category", Some(&[("category_id", "12")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
