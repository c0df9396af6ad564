//! Catalogue view models.
//!
//! These are the shapes the storefront works with after a category fetch.
//! They are immutable for the lifetime of a browsing request: filtering and
//! sorting borrow from them and never mutate the raw list.

mod category;
mod facets;
mod page;
mod product;

pub use category::Category;
pub use facets::{Facets, PriceBounds, facet_order};
pub use page::CategoryPage;
pub use product::{Product, Seller};
