//! Atelier Core - Catalogue domain library.
//!
//! This crate provides the types and pure logic shared by all Atelier components:
//! - `storefront` - Category browsing pages and JSON view
//! - `cli` - Command-line catalogue browsing
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. The storefront owns fetching; this crate owns what happens to the
//! fetched catalogue afterwards.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices
//! - [`catalogue`] - Product and category view models, facet extraction
//! - [`filter`] - Filter state, its mutators and the derived product view

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalogue;
pub mod filter;
pub mod types;

pub use catalogue::{Category, CategoryPage, Facets, PriceBounds, Product, Seller};
pub use filter::{FilterState, SortKey, SortOrder, parse_price_input};
pub use types::*;
