//! Category view model.

use serde::{Deserialize, Serialize};

use crate::types::CategoryId;

/// A catalogue category with its direct children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: Option<String>,
    pub parent_id: Option<CategoryId>,
    /// Child categories in display order.
    pub children: Vec<Self>,
    /// Number of products in this category across all pages.
    pub product_count: u64,
}

impl Category {
    /// Look up a direct child by ID.
    #[must_use]
    pub fn child(&self, id: CategoryId) -> Option<&Self> {
        self.children.iter().find(|c| c.id == id)
    }

    /// Whether the category has no subcategories to offer as chips.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
