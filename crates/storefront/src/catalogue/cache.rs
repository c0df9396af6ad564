//! Cache key for catalogue responses.

use atelier_core::CategoryId;

/// One cached category page.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct CacheKey {
    pub category: CategoryId,
    pub page: u32,
    pub page_size: u32,
}
