//! One fetched page of a category.

use serde::{Deserialize, Serialize};

use super::{Category, Facets, Product};

/// Category metadata plus one page of its products, as returned by a single
/// catalogue fetch.
///
/// Facets are computed once, when the page is built, from the raw product
/// list. Filtering the page later does not touch them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPage {
    pub category: Category,
    pub products: Vec<Product>,
    pub facets: Facets,
    /// 1-based page number that was requested.
    pub page: u32,
    pub page_size: u32,
}

impl CategoryPage {
    /// Build a page and extract its facets.
    #[must_use]
    pub fn new(category: Category, products: Vec<Product>, page: u32, page_size: u32) -> Self {
        let facets = Facets::extract(&products);
        Self {
            category,
            products,
            facets,
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Total number of pages for the category, never less than one.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        let pages = self
            .category
            .product_count
            .div_ceil(u64::from(self.page_size))
            .max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Whether another page follows this one.
    #[must_use]
    pub fn has_more_pages(&self) -> bool {
        self.page < self.total_pages()
    }
}
