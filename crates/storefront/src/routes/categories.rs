//! Category browsing route handlers.

use std::collections::BTreeSet;
use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use atelier_core::{CategoryId, CategoryPage, FilterState, Product, SortKey, SortOrder};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::catalogue::CatalogueError;
use crate::error::{AppError, add_breadcrumb};
use crate::state::AppState;

use super::query::BrowseParams;

/// Sort choices offered to shoppers, in display order.
const SORT_OPTIONS: [(&str, SortKey, SortOrder); 4] = [
    ("Newest", SortKey::CreatedAt, SortOrder::Desc),
    ("Price: low to high", SortKey::Price, SortOrder::Asc),
    ("Price: high to low", SortKey::Price, SortOrder::Desc),
    ("Most viewed", SortKey::Views, SortOrder::Desc),
];

// =============================================================================
// View Models
// =============================================================================

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: Option<String>,
    pub seller: Option<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
}

/// A toggleable link: facet value, subcategory chip or sort option.
#[derive(Clone)]
pub struct LinkView {
    pub label: String,
    pub href: String,
    pub selected: bool,
}

/// Pagination links.
#[derive(Clone)]
pub struct PaginationView {
    pub current_page: u32,
    pub total_pages: u32,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price.display(),
            image: product.primary_image().map(str::to_string),
            seller: product.seller.as_ref().map(|s| s.display_name.clone()),
            colors: product.colors.iter().cloned().collect(),
            sizes: product.sizes.iter().cloned().collect(),
        }
    }
}

/// Category page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub name: String,
    /// Name of the selected subcategory, when it is a child of this category.
    pub subcategory_name: Option<String>,
    pub path: String,
    pub subcategories: Vec<LinkView>,
    pub colors: Vec<LinkView>,
    pub sizes: Vec<LinkView>,
    pub tags: Vec<LinkView>,
    pub sort_options: Vec<LinkView>,
    /// Query pairs the price form must carry along.
    pub hidden_params: Vec<(&'static str, String)>,
    pub min_price: String,
    pub max_price: String,
    pub price_min_placeholder: String,
    pub price_max_placeholder: String,
    pub products: Vec<ProductCardView>,
    pub fetched_count: usize,
    pub active_filters: usize,
    pub clear_href: String,
    pub pagination: PaginationView,
}

/// Category error page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/error.html")]
pub struct CategoryErrorTemplate {
    pub title: String,
    pub message: String,
    pub reload_href: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display a category page with filters applied.
#[instrument(skip(state, query), fields(category = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let params = BrowseParams::from_pairs(&query);
    let path = format!("/categories/{id}");

    match fetch_page(&state, id, &params).await {
        Ok(page) => {
            let category_id = id.to_string();
            add_breadcrumb(
                "navigation",
                "Viewed category",
                Some(&[("category_id", category_id.as_str())]),
            );
            render_category(&page, &params, &path).into_response()
        }
        Err(err) => {
            err.report();
            let (title, message) = match &err {
                AppError::Catalogue(CatalogueError::NotFound(_)) => (
                    "Category not found".to_string(),
                    "This category does not exist or is no longer available.".to_string(),
                ),
                _ => (
                    "Something went wrong".to_string(),
                    "We could not load this category. Please try again.".to_string(),
                ),
            };
            (
                err.status(),
                CategoryErrorTemplate {
                    title,
                    message,
                    reload_href: params.href(&path),
                },
            )
                .into_response()
        }
    }
}

/// Fetch the requested page of a category.
pub(super) async fn fetch_page(
    state: &AppState,
    id: CategoryId,
    params: &BrowseParams,
) -> Result<Arc<CategoryPage>, AppError> {
    let catalogue = state.catalogue();
    Ok(catalogue
        .fetch_category(id, params.page, catalogue.default_page_size())
        .await?)
}

/// Build the category page template from a fetched page and the URL state.
fn render_category(page: &CategoryPage, params: &BrowseParams, path: &str) -> CategoryShowTemplate {
    let filters = &params.filters;
    let products: Vec<ProductCardView> = filters
        .apply(&page.products)
        .into_iter()
        .map(ProductCardView::from)
        .collect();

    let mut subcategories = Vec::with_capacity(page.category.children.len() + 1);
    if !page.category.is_leaf() {
        subcategories.push(LinkView {
            label: "All".to_string(),
            href: params.with_filters(FilterState::clear_subcategory).href(path),
            selected: filters.subcategory.is_none(),
        });
    }
    subcategories.extend(page.category.children.iter().map(|child| LinkView {
        label: child.name.clone(),
        href: params
            .with_filters(|f| f.select_subcategory(child.id))
            .href(path),
        selected: filters.subcategory == Some(child.id),
    }));

    let colors = facet_links(
        params,
        path,
        &page.facets.colors,
        &filters.colors,
        FilterState::toggle_color,
    );
    let sizes = facet_links(
        params,
        path,
        &page.facets.sizes,
        &filters.sizes,
        FilterState::toggle_size,
    );
    let tags = facet_links(
        params,
        path,
        &page.facets.tags,
        &filters.tags,
        FilterState::toggle_tag,
    );

    let sort_options = SORT_OPTIONS
        .iter()
        .map(|(label, key, order)| LinkView {
            label: (*label).to_string(),
            href: params.with_filters(|f| f.set_sort(*key, *order)).href(path),
            selected: filters.sort == *key && filters.order == *order,
        })
        .collect();

    let hidden_params = params
        .to_pairs()
        .into_iter()
        .filter(|(key, _)| !matches!(*key, "min_price" | "max_price" | "page"))
        .collect();

    let total_pages = page.total_pages();
    let pagination = PaginationView {
        current_page: page.page,
        total_pages,
        prev_href: (page.page > 1).then(|| params.with_page(page.page - 1).href(path)),
        next_href: page
            .has_more_pages()
            .then(|| params.with_page(page.page + 1).href(path)),
    };

    let (price_min_placeholder, price_max_placeholder) = page
        .facets
        .price_bounds
        .map(|b| (b.min.to_string(), b.max.to_string()))
        .unwrap_or_default();

    CategoryShowTemplate {
        name: page.category.name.clone(),
        subcategory_name: filters
            .subcategory
            .and_then(|id| page.category.child(id))
            .map(|child| child.name.clone()),
        path: path.to_string(),
        subcategories,
        colors,
        sizes,
        tags,
        sort_options,
        hidden_params,
        min_price: filters.min_price.map(|p| p.to_string()).unwrap_or_default(),
        max_price: filters.max_price.map(|p| p.to_string()).unwrap_or_default(),
        price_min_placeholder,
        price_max_placeholder,
        products,
        fetched_count: page.products.len(),
        active_filters: filters.active_filter_count(),
        clear_href: params.with_filters(FilterState::reset).href(path),
        pagination,
    }
}

/// One link per facet value, each toggling that value in the current state.
fn facet_links(
    params: &BrowseParams,
    path: &str,
    values: &[String],
    selected: &BTreeSet<String>,
    toggle: fn(&mut FilterState, &str),
) -> Vec<LinkView> {
    values
        .iter()
        .map(|value| LinkView {
            label: value.clone(),
            href: params.with_filters(|f| toggle(f, value)).href(path),
            selected: selected.contains(value),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use atelier_core::{Category, CurrencyCode, Price, ProductId};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: i64, price: i64, colors: &[&str], category: i64, day: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::new(Decimal::new(price, 0), CurrencyCode::Eur),
            images: vec![format!("https://cdn.example.com/{id}.jpg")],
            sizes: BTreeSet::new(),
            colors: colors.iter().map(|c| (*c).to_string()).collect(),
            tags: BTreeSet::new(),
            view_count: 0,
            sales_count: 0,
            created_at: Utc.with_ymd_and_hms(2026, 3, day, 0, 0, 0).unwrap(),
            category_id: CategoryId::new(category),
            seller: None,
        }
    }

    fn page() -> CategoryPage {
        let child = |id: i64, name: &str| Category {
            id: CategoryId::new(id),
            name: name.to_string(),
            slug: None,
            parent_id: Some(CategoryId::new(10)),
            children: Vec::new(),
            product_count: 1,
        };
        CategoryPage::new(
            Category {
                id: CategoryId::new(10),
                name: "Dresses".to_string(),
                slug: Some("dresses".to_string()),
                parent_id: None,
                children: vec![child(11, "Maxi"), child(12, "Mini")],
                product_count: 30,
            },
            vec![
                product(1, 50, &["RED"], 11, 1),
                product(2, 150, &["BLUE"], 12, 2),
            ],
            1,
            24,
        )
    }

    fn params(raw: &[(&str, &str)]) -> BrowseParams {
        let pairs: Vec<(String, String)> = raw
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        BrowseParams::from_pairs(&pairs)
    }

    #[test]
    fn test_render_unfiltered() {
        let view = render_category(&page(), &params(&[]), "/categories/10");

        assert_eq!(view.name, "Dresses");
        assert!(view.subcategory_name.is_none());
        assert_eq!(view.products.len(), 2);
        assert_eq!(view.products[0].id, "2");
        assert_eq!(view.products[0].price, "€150.00");
        assert_eq!(view.active_filters, 0);
        assert_eq!(view.subcategories.len(), 3);
        assert!(view.subcategories[0].selected);
        assert_eq!(view.pagination.total_pages, 2);
        assert_eq!(
            view.pagination.next_href.as_deref(),
            Some("/categories/10?page=2")
        );
        assert!(view.pagination.prev_href.is_none());
        assert_eq!(view.price_min_placeholder, "50");
    }

    #[test]
    fn test_render_with_min_price() {
        let view = render_category(&page(), &params(&[("min_price", "100")]), "/categories/10");

        assert_eq!(view.products.len(), 1);
        assert_eq!(view.products[0].id, "2");
        assert_eq!(view.min_price, "100");
        assert_eq!(view.active_filters, 1);
        assert_eq!(view.clear_href, "/categories/10");
    }

    #[test]
    fn test_facets_offer_every_value_while_filtered() {
        let view = render_category(&page(), &params(&[("color", "RED")]), "/categories/10");

        let labels: Vec<&str> = view.colors.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["BLUE", "RED"]);

        let red = view.colors.iter().find(|l| l.label == "RED").unwrap();
        assert!(red.selected);
        assert_eq!(red.href, "/categories/10");

        let blue = view.colors.iter().find(|l| l.label == "BLUE").unwrap();
        assert!(!blue.selected);
        assert_eq!(blue.href, "/categories/10?color=BLUE&color=RED");
    }

    #[test]
    fn test_subcategory_chip_links() {
        let view = render_category(&page(), &params(&[("subcategory", "12")]), "/categories/10");

        assert_eq!(view.products.len(), 1);
        assert_eq!(view.subcategory_name.as_deref(), Some("Mini"));
        assert!(!view.subcategories[0].selected);
        assert_eq!(view.subcategories[0].href, "/categories/10");
        assert!(view.subcategories[2].selected);
        assert_eq!(view.subcategories[1].href, "/categories/10?subcategory=11");
    }

    #[test]
    fn test_sort_links_and_clear_resets_sort() {
        let view = render_category(
            &page(),
            &params(&[("sort", "price"), ("order", "asc"), ("color", "RED")]),
            "/categories/10",
        );

        let selected: Vec<&str> = view
            .sort_options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(selected, vec!["Price: low to high"]);
        assert_eq!(view.clear_href, "/categories/10");
        assert_eq!(
            view.hidden_params,
            vec![
                ("color", "RED".to_string()),
                ("sort", "price".to_string()),
                ("order", "asc".to_string())
            ]
        );
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let view = render_category(&page(), &params(&[("color", "GREEN")]), "/categories/10");
        assert!(view.products.is_empty());
        assert_eq!(view.fetched_count, 2);
        assert_eq!(view.active_filters, 1);
    }

    #[test]
    fn test_clear_link_restores_default_state() {
        let view = render_category(
            &page(),
            &params(&[
                ("sort", "price"),
                ("order", "asc"),
                ("color", "RED"),
                ("min_price", "10"),
                ("subcategory", "11"),
            ]),
            "/categories/10",
        );

        let query = view
            .clear_href
            .strip_prefix("/categories/10")
            .unwrap()
            .trim_start_matches('?');
        let cleared = params(
            &query
                .split('&')
                .filter(|pair| !pair.is_empty())
                .filter_map(|pair| pair.split_once('='))
                .collect::<Vec<_>>(),
        );
        assert_eq!(cleared.filters, FilterState::default());

        let ids: Vec<String> = render_category(&page(), &cleared, "/categories/10")
            .products
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["2", "1"]);
    }
}
