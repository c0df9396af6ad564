//! Filter state and the derived product view.
//!
//! [`FilterState`] holds everything a shopper has selected on a category
//! page. The visible listing is always [`FilterState::apply`] over the raw
//! product list: a product is kept when it passes every active dimension
//! (subcategory, price floor, price ceiling, colors, sizes, tags), and within
//! a multi-value dimension any one selected value is enough.
//!
//! # Example
//!
//! ```rust
//! use atelier_core::{FilterState, SortKey, SortOrder};
//!
//! let mut filters = FilterState::default();
//! filters.toggle_color("RED");
//! filters.set_sort(SortKey::Price, SortOrder::Asc);
//! assert_eq!(filters.active_filter_count(), 1);
//!
//! filters.reset();
//! assert_eq!(filters, FilterState::default());
//! ```

mod sort;

use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalogue::Product;
use crate::types::CategoryId;

pub use sort::{SortKey, SortOrder, UnknownSortValue};

/// Shopper-selected filters and ordering for one category listing.
///
/// The default value has no active filters and lists newest products first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub colors: BTreeSet<String>,
    pub sizes: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub sort: SortKey,
    pub order: SortOrder,
    pub subcategory: Option<CategoryId>,
}

impl FilterState {
    // =========================================================================
    // Mutators
    // =========================================================================

    pub const fn set_min_price(&mut self, min_price: Option<Decimal>) {
        self.min_price = min_price;
    }

    pub const fn set_max_price(&mut self, max_price: Option<Decimal>) {
        self.max_price = max_price;
    }

    /// Set both price bounds at once. Bounds are kept as given, so a floor
    /// above the ceiling yields an empty listing.
    pub const fn set_price_range(&mut self, min_price: Option<Decimal>, max_price: Option<Decimal>) {
        self.min_price = min_price;
        self.max_price = max_price;
    }

    /// Add `color` to the selection, or remove it if already selected.
    pub fn toggle_color(&mut self, color: &str) {
        toggle(&mut self.colors, color);
    }

    /// Add `size` to the selection, or remove it if already selected.
    pub fn toggle_size(&mut self, size: &str) {
        toggle(&mut self.sizes, size);
    }

    /// Add `tag` to the selection, or remove it if already selected.
    pub fn toggle_tag(&mut self, tag: &str) {
        toggle(&mut self.tags, tag);
    }

    pub const fn set_sort(&mut self, sort: SortKey, order: SortOrder) {
        self.sort = sort;
        self.order = order;
    }

    pub const fn select_subcategory(&mut self, id: CategoryId) {
        self.subcategory = Some(id);
    }

    pub const fn clear_subcategory(&mut self) {
        self.subcategory = None;
    }

    /// Clear every filter and restore newest-first ordering.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of active filter dimensions. Ordering does not count.
    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        [
            self.subcategory.is_some(),
            self.min_price.is_some(),
            self.max_price.is_some(),
            !self.colors.is_empty(),
            !self.sizes.is_empty(),
            !self.tags.is_empty(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Whether any filter dimension is active.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        self.active_filter_count() > 0
    }

    /// Whether `product` passes every active filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if self
            .subcategory
            .is_some_and(|id| product.category_id != id)
        {
            return false;
        }
        if self.min_price.is_some_and(|min| product.price.amount < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price.amount > max) {
            return false;
        }

        intersects(&self.colors, &product.colors)
            && intersects(&self.sizes, &product.sizes)
            && intersects(&self.tags, &product.tags)
    }

    /// Derive the visible listing from the raw product list.
    ///
    /// The sort is stable: products with equal keys keep their fetch order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut visible: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        visible.sort_by(|a, b| self.order.apply(self.sort.compare(a, b)));
        visible
    }
}

/// Parse a shopper-entered price.
///
/// Empty, malformed and negative input all mean "no bound"; this never fails.
#[must_use]
pub fn parse_price_input(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    Decimal::from_str(trimmed)
        .ok()
        .filter(|amount| !amount.is_sign_negative())
}

fn toggle(selection: &mut BTreeSet<String>, value: &str) {
    if !selection.remove(value) {
        selection.insert(value.to_string());
    }
}

/// An empty selection leaves the dimension inactive.
fn intersects(selected: &BTreeSet<String>, available: &BTreeSet<String>) -> bool {
    selected.is_empty() || !selected.is_disjoint(available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::fixtures::{at, product, set};

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    fn ids(products: &[&Product]) -> Vec<i64> {
        products.iter().map(|p| p.id.as_i64()).collect()
    }

    /// A small catalogue covering every filter dimension.
    fn catalogue() -> Vec<Product> {
        let mut a = product(1, 50);
        a.colors = set(&["RED"]);
        a.sizes = set(&["S"]);
        a.tags = set(&["summer"]);
        a.created_at = at(1);
        a.view_count = 30;

        let mut b = product(2, 150);
        b.colors = set(&["BLUE"]);
        b.sizes = set(&["M", "L"]);
        b.tags = set(&["linen", "summer"]);
        b.created_at = at(3);
        b.view_count = 10;
        b.category_id = CategoryId::new(2);

        let mut c = product(3, 90);
        c.colors = set(&["RED", "black"]);
        c.sizes = set(&["M"]);
        c.created_at = at(2);
        c.view_count = 20;
        c.category_id = CategoryId::new(2);

        vec![a, b, c]
    }

    fn sample_states() -> Vec<FilterState> {
        let mut states = vec![FilterState::default()];

        let mut s = FilterState::default();
        s.set_min_price(Some(dec(100)));
        states.push(s);

        let mut s = FilterState::default();
        s.set_price_range(Some(dec(60)), Some(dec(150)));
        s.toggle_size("M");
        states.push(s);

        let mut s = FilterState::default();
        s.toggle_color("RED");
        s.toggle_tag("summer");
        states.push(s);

        let mut s = FilterState::default();
        s.select_subcategory(CategoryId::new(2));
        s.toggle_color("black");
        s.toggle_color("BLUE");
        s.set_sort(SortKey::Views, SortOrder::Asc);
        states.push(s);

        let mut s = FilterState::default();
        s.set_price_range(Some(dec(200)), Some(dec(10)));
        states.push(s);

        states
    }

    /// Each clause checked on its own, independent of `matches`.
    fn satisfies_all_clauses(state: &FilterState, p: &Product) -> bool {
        let subcategory = state.subcategory.is_none_or(|id| p.category_id == id);
        let min = state.min_price.is_none_or(|min| p.price.amount >= min);
        let max = state.max_price.is_none_or(|max| p.price.amount <= max);
        let colors = state.colors.is_empty() || state.colors.iter().any(|c| p.colors.contains(c));
        let sizes = state.sizes.is_empty() || state.sizes.iter().any(|s| p.sizes.contains(s));
        let tags = state.tags.is_empty() || state.tags.iter().any(|t| p.tags.contains(t));
        subcategory && min && max && colors && sizes && tags
    }

    #[test]
    fn test_default_sorts_newest_first() {
        let products = catalogue();
        let view = FilterState::default().apply(&products);
        assert_eq!(ids(&view), vec![2, 3, 1]);
    }

    #[test]
    fn test_min_price_scenario() {
        let mut red = product(1, 50);
        red.colors = set(&["RED"]);
        let mut blue = product(2, 150);
        blue.colors = set(&["BLUE"]);
        let products = vec![red, blue];

        let mut state = FilterState::default();
        state.set_min_price(Some(dec(100)));
        assert_eq!(ids(&state.apply(&products)), vec![2]);
    }

    #[test]
    fn test_price_ascending_scenario() {
        let products = vec![product(1, 150), product(2, 50)];

        let mut state = FilterState::default();
        state.set_sort(SortKey::Price, SortOrder::Asc);
        assert_eq!(ids(&state.apply(&products)), vec![2, 1]);
    }

    #[test]
    fn test_size_selection_scenario() {
        let mut small = product(1, 50);
        small.sizes = set(&["S"]);
        let mut medium_large = product(2, 50);
        medium_large.sizes = set(&["M", "L"]);
        let products = vec![small, medium_large];

        let mut state = FilterState::default();
        state.toggle_size("M");
        assert_eq!(ids(&state.apply(&products)), vec![2]);
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let products = vec![product(1, 100), product(2, 200)];

        let mut state = FilterState::default();
        state.set_price_range(Some(dec(100)), Some(dec(200)));
        assert_eq!(state.apply(&products).len(), 2);
    }

    #[test]
    fn test_colors_or_within_dimension_and_across() {
        let products = catalogue();

        let mut state = FilterState::default();
        state.toggle_color("RED");
        state.toggle_color("BLUE");
        state.set_sort(SortKey::Price, SortOrder::Asc);
        assert_eq!(ids(&state.apply(&products)), vec![1, 3, 2]);

        state.toggle_size("M");
        assert_eq!(ids(&state.apply(&products)), vec![3, 2]);
    }

    #[test]
    fn test_color_match_is_case_sensitive() {
        let products = catalogue();

        let mut state = FilterState::default();
        state.toggle_color("red");
        assert!(state.apply(&products).is_empty());
    }

    #[test]
    fn test_subcategory_filter() {
        let products = catalogue();

        let mut state = FilterState::default();
        state.select_subcategory(CategoryId::new(2));
        assert_eq!(ids(&state.apply(&products)), vec![2, 3]);

        state.clear_subcategory();
        assert_eq!(state.apply(&products).len(), 3);
    }

    #[test]
    fn test_derived_list_is_subset_of_raw_list() {
        let products = catalogue();
        for state in sample_states() {
            for p in state.apply(&products) {
                assert!(
                    products.iter().any(|raw| std::ptr::eq(raw, p)),
                    "{state:?} produced a product outside the input"
                );
            }
        }
    }

    #[test]
    fn test_membership_iff_all_clauses_hold() {
        let products = catalogue();
        for state in sample_states() {
            let view = state.apply(&products);
            for p in &products {
                let listed = view.iter().any(|v| v.id == p.id);
                assert_eq!(
                    listed,
                    satisfies_all_clauses(&state, p),
                    "product {} under {state:?}",
                    p.id
                );
            }
        }
    }

    #[test]
    fn test_apply_does_not_touch_raw_list() {
        let products = catalogue();
        let before = products.clone();

        let mut state = FilterState::default();
        state.set_sort(SortKey::Price, SortOrder::Asc);
        let _ = state.apply(&products);

        assert_eq!(products, before);
    }

    #[test]
    fn test_stable_sort_keeps_fetch_order_for_ties() {
        let products = vec![product(1, 50), product(2, 50), product(3, 50)];

        let mut state = FilterState::default();
        state.set_sort(SortKey::Price, SortOrder::Asc);
        assert_eq!(ids(&state.apply(&products)), vec![1, 2, 3]);

        state.set_sort(SortKey::Price, SortOrder::Desc);
        assert_eq!(ids(&state.apply(&products)), vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_by_views_descending() {
        let products = catalogue();

        let mut state = FilterState::default();
        state.set_sort(SortKey::Views, SortOrder::Desc);
        assert_eq!(ids(&state.apply(&products)), vec![1, 3, 2]);
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        for original in sample_states() {
            let mut state = original.clone();
            state.toggle_color("GREEN");
            assert_ne!(state, original);
            state.toggle_color("GREEN");
            assert_eq!(state, original);

            state.toggle_tag("summer");
            state.toggle_tag("summer");
            state.toggle_size("XL");
            state.toggle_size("XL");
            assert_eq!(state, original);
        }
    }

    #[test]
    fn test_toggle_never_duplicates() {
        let mut state = FilterState::default();
        state.toggle_color("RED");
        state.toggle_color("BLUE");
        state.toggle_color("RED");
        state.toggle_color("RED");
        assert_eq!(state.colors, set(&["BLUE", "RED"]));
    }

    #[test]
    fn test_reset_restores_newest_first_raw_list() {
        let products = catalogue();
        let mut expected: Vec<&Product> = products.iter().collect();
        expected.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        for mut state in sample_states() {
            state.reset();
            assert!(!state.is_filtered());
            assert_eq!(ids(&state.apply(&products)), ids(&expected));
        }
    }

    #[test]
    fn test_inverted_price_range_lists_nothing() {
        let products = catalogue();

        let mut state = FilterState::default();
        state.set_price_range(Some(dec(200)), Some(dec(10)));
        assert!(state.apply(&products).is_empty());
    }

    #[test]
    fn test_active_filter_count() {
        let mut state = FilterState::default();
        assert_eq!(state.active_filter_count(), 0);

        state.set_sort(SortKey::Price, SortOrder::Asc);
        assert_eq!(state.active_filter_count(), 0);

        state.toggle_color("RED");
        state.toggle_color("BLUE");
        state.set_max_price(Some(dec(80)));
        assert_eq!(state.active_filter_count(), 2);
        assert!(state.is_filtered());
    }

    #[test]
    fn test_parse_price_input() {
        assert_eq!(parse_price_input("100"), Some(dec(100)));
        assert_eq!(parse_price_input(" 49.90 "), Some(Decimal::new(4990, 2)));
        assert_eq!(parse_price_input(""), None);
        assert_eq!(parse_price_input("   "), None);
        assert_eq!(parse_price_input("abc"), None);
        assert_eq!(parse_price_input("12..5"), None);
        assert_eq!(parse_price_input("-5"), None);
    }

    #[test]
    fn test_facets_unchanged_by_filtering() {
        use crate::catalogue::Facets;

        let products = catalogue();
        let facets = Facets::extract(&products);

        let mut state = FilterState::default();
        state.toggle_color("BLUE");
        let _ = state.apply(&products);

        assert_eq!(Facets::extract(&products), facets);
        assert_eq!(facets.colors, vec!["black", "BLUE", "RED"]);
    }
}
