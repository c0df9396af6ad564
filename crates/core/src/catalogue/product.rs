//! Product view model.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Price, ProductId, SellerId};

/// A product as listed on a category page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image URLs in display order; the first one is the card image.
    pub images: Vec<String>,
    pub sizes: BTreeSet<String>,
    pub colors: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub view_count: u64,
    pub sales_count: u64,
    pub created_at: DateTime<Utc>,
    /// Category the product is listed under (a subcategory of the page's category
    /// when the page aggregates children).
    pub category_id: CategoryId,
    pub seller: Option<Seller>,
}

impl Product {
    /// Image shown on the product card.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Seller display fields embedded in a product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    pub id: SellerId,
    pub shop_name: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}
