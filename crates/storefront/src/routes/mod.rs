//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Health check (in lib.rs)
//!
//! # Categories
//! GET  /categories/{id}         - Category page (filters in the query string)
//!
//! # JSON API
//! GET  /api/categories/{id}     - Filtered category page as JSON
//! ```
//!
//! Both category routes accept the query parameters described in [`query`].

pub mod api;
pub mod categories;
pub mod query;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new().route("/{id}", get(categories::show))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/categories/{id}", get(api::category))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Category pages
        .nest("/categories", category_routes())
        // JSON API
        .nest("/api", api_routes())
}
