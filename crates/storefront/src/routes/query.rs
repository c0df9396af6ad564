//! Browsing state carried in the page URL.
//!
//! A category page's [`FilterState`] lives entirely in its query string, so
//! every shopper action (toggling a color, choosing a sort, paging) is a
//! plain link to the mutated state.
//!
//! ```text
//! ?subcategory=11&min_price=50&max_price=150&color=RED&color=black&size=M
//!  &tag=linen&sort=price&order=asc&page=2
//! ```
//!
//! Decoding never fails: unknown keys are ignored and malformed values leave
//! their dimension inactive (or the sort at its default).

use atelier_core::{CategoryId, FilterState, SortKey, SortOrder, parse_price_input};

/// Filter state plus the requested page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseParams {
    pub filters: FilterState,
    /// 1-based page number.
    pub page: u32,
}

impl BrowseParams {
    /// Decode from raw query pairs, in URL order.
    #[must_use]
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut filters = FilterState::default();
        let mut page = 1;
        let mut sort = None;
        let mut order = None;

        for (key, value) in pairs {
            match key.as_str() {
                "min_price" => filters.set_min_price(parse_price_input(value)),
                "max_price" => filters.set_max_price(parse_price_input(value)),
                "color" => add_value(&mut filters.colors, value),
                "size" => add_value(&mut filters.sizes, value),
                "tag" => add_value(&mut filters.tags, value),
                "sort" => sort = value.parse::<SortKey>().ok().or(sort),
                "order" => order = value.parse::<SortOrder>().ok().or(order),
                "subcategory" => {
                    if let Ok(id) = value.parse::<CategoryId>() {
                        filters.select_subcategory(id);
                    }
                }
                "page" => {
                    page = value.trim().parse::<u32>().ok().filter(|p| *p > 0).unwrap_or(page);
                }
                _ => {}
            }
        }

        filters.set_sort(sort.unwrap_or_default(), order.unwrap_or_default());

        Self { filters, page }
    }

    /// Same state on another page.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            filters: self.filters.clone(),
            page: page.max(1),
        }
    }

    /// Same page with the filters changed by `mutate`.
    #[must_use]
    pub fn with_filters(&self, mutate: impl FnOnce(&mut FilterState)) -> Self {
        let mut filters = self.filters.clone();
        mutate(&mut filters);
        Self {
            filters,
            page: self.page,
        }
    }

    /// Canonical query pairs: fixed key order, defaults omitted.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let f = &self.filters;
        let mut pairs = Vec::new();

        if let Some(id) = f.subcategory {
            pairs.push(("subcategory", id.to_string()));
        }
        if let Some(min) = f.min_price {
            pairs.push(("min_price", min.to_string()));
        }
        if let Some(max) = f.max_price {
            pairs.push(("max_price", max.to_string()));
        }
        pairs.extend(f.colors.iter().map(|c| ("color", c.clone())));
        pairs.extend(f.sizes.iter().map(|s| ("size", s.clone())));
        pairs.extend(f.tags.iter().map(|t| ("tag", t.clone())));
        if f.sort != SortKey::default() {
            pairs.push(("sort", f.sort.to_string()));
        }
        if f.order != SortOrder::default() {
            pairs.push(("order", f.order.to_string()));
        }
        if self.page > 1 {
            pairs.push(("page", self.page.to_string()));
        }

        pairs
    }

    /// Percent-encoded query string without the leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.to_pairs()
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Link to `path` carrying this state.
    #[must_use]
    pub fn href(&self, path: &str) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{query}")
        }
    }
}

/// Selecting the same value twice in a URL keeps it selected once.
fn add_value(selection: &mut std::collections::BTreeSet<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        selection.insert(value.to_string());
    }
}
