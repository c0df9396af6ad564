//! Wire records returned by the catalogue API.
//!
//! These mirror the backend's camelCase JSON and are converted into
//! `atelier_core` view models by [`super::conversions`]. List fields and
//! counters default when the backend omits them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `GET /categories/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub category: CategoryRecord,
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub children: Vec<Self>,
    #[serde(default)]
    pub product_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    /// Accepted as a JSON string or number.
    pub price: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub sales_count: u64,
    pub created_at: DateTime<Utc>,
    pub category_id: i64,
    #[serde(default)]
    pub seller: Option<SellerRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerRecord {
    pub id: i64,
    pub shop_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

fn default_currency() -> String {
    "EUR".to_string()
}
