//! Facet extraction.
//!
//! Facets are taken from the raw product list of a fetch, never from the
//! filtered view, so the sidebar keeps offering every value the category has
//! while the shopper narrows the listing down.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;
use crate::types::CurrencyCode;

/// Distinct filterable values present in a product list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub tags: Vec<String>,
    /// Cheapest and most expensive listing, `None` for an empty list.
    pub price_bounds: Option<PriceBounds>,
}

/// Lowest and highest product price in a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBounds {
    pub min: Decimal,
    pub max: Decimal,
    pub currency_code: CurrencyCode,
}

impl Facets {
    /// Collect facets with a single pass over `products`.
    ///
    /// Each sequence is deduplicated and ordered with [`facet_order`].
    #[must_use]
    pub fn extract(products: &[Product]) -> Self {
        let mut colors = BTreeSet::new();
        let mut sizes = BTreeSet::new();
        let mut tags = BTreeSet::new();
        let mut price_bounds: Option<PriceBounds> = None;

        for product in products {
            colors.extend(product.colors.iter().map(String::as_str));
            sizes.extend(product.sizes.iter().map(String::as_str));
            tags.extend(product.tags.iter().map(String::as_str));

            let amount = product.price.amount;
            price_bounds = Some(match price_bounds {
                None => PriceBounds {
                    min: amount,
                    max: amount,
                    currency_code: product.price.currency_code,
                },
                Some(bounds) => PriceBounds {
                    min: bounds.min.min(amount),
                    max: bounds.max.max(amount),
                    ..bounds
                },
            });
        }

        Self {
            colors: sorted(colors),
            sizes: sorted(sizes),
            tags: sorted(tags),
            price_bounds,
        }
    }

    /// Whether there is nothing to offer in the filter sidebar.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.sizes.is_empty() && self.tags.is_empty()
    }
}

/// Display order for facet values: alphabetical ignoring case, with the
/// byte order of the original strings breaking ties so the result is total.
/// Plain `Ord` on the strings would put `"RED"` before `"black"`; shoppers
/// expect `["black", "RED"]`.
#[must_use]
pub fn facet_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn sorted(values: BTreeSet<&str>) -> Vec<String> {
    let mut values: Vec<String> = values.into_iter().map(str::to_string).collect();
    values.sort_by(|a, b| facet_order(a, b));
    values
}
