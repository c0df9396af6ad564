//! JSON API route handlers.
//!
//! Mirrors the HTML category page for scripted clients: the same query string
//! produces the same filtered product list.

use atelier_core::{Category, CategoryId, Facets, FilterState, Product};
use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

use super::categories::fetch_page;
use super::query::BrowseParams;

/// Pagination metadata for the fetched page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_more: bool,
}

/// JSON body for `GET /api/categories/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPageResponse<'a> {
    pub category: &'a Category,
    pub facets: &'a Facets,
    pub filters: &'a FilterState,
    pub products: Vec<&'a Product>,
    /// Products on the fetched page before filtering.
    pub total: usize,
    /// Products left after filtering.
    pub visible: usize,
    pub pagination: PaginationMeta,
}

/// Filtered category page as JSON.
///
/// # Errors
///
/// Responds 404 for an unknown category and 502/503 when the catalogue API
/// cannot serve the page.
#[instrument(skip(state, query), fields(category = %id))]
pub async fn category(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let params = BrowseParams::from_pairs(&query);
    let page = fetch_page(&state, id, &params).await?;

    let products = params.filters.apply(&page.products);
    let body = CategoryPageResponse {
        category: &page.category,
        facets: &page.facets,
        filters: &params.filters,
        total: page.products.len(),
        visible: products.len(),
        products,
        pagination: PaginationMeta {
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages(),
            has_more: page.has_more_pages(),
        },
    };

    Ok(Json(body).into_response())
}
