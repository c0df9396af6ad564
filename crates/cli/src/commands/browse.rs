//! `atelier browse` - print a category page with filters applied.
//!
//! # Usage
//!
//! ```bash
//! atelier browse 12 --min-price 50 --max-price 150 --size M --sort price --order asc
//! atelier browse 12 --subcategory 14 --tag linen --json
//! ```
//!
//! Malformed price input leaves that bound inactive, as on the category page.

use std::io::{self, Write};

use atelier_core::{
    CategoryId, CategoryPage, FilterState, Product, SortKey, SortOrder, parse_price_input,
};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{CommandError, catalogue_client};

/// Arguments for `atelier browse`.
#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Category ID
    pub category: CategoryId,

    /// Page number (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Products per page (defaults to `CATALOGUE_PAGE_SIZE`)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Lowest price to include
    #[arg(long, allow_hyphen_values = true)]
    pub min_price: Option<String>,

    /// Highest price to include
    #[arg(long, allow_hyphen_values = true)]
    pub max_price: Option<String>,

    /// Color to include (repeatable)
    #[arg(long = "color")]
    pub colors: Vec<String>,

    /// Size to include (repeatable)
    #[arg(long = "size")]
    pub sizes: Vec<String>,

    /// Tag to include (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Sort key (`created`, `price`, `views`)
    #[arg(long, default_value_t)]
    pub sort: SortKey,

    /// Sort direction (`asc`, `desc`)
    #[arg(long, default_value_t)]
    pub order: SortOrder,

    /// Only products in this subcategory
    #[arg(long)]
    pub subcategory: Option<CategoryId>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl BrowseArgs {
    /// Filter state described by the arguments.
    #[must_use]
    pub fn filter_state(&self) -> FilterState {
        let mut filters = FilterState::default();

        filters.set_price_range(
            parse_bound("--min-price", self.min_price.as_deref()),
            parse_bound("--max-price", self.max_price.as_deref()),
        );
        for color in &self.colors {
            filters.colors.insert(color.clone());
        }
        for size in &self.sizes {
            filters.sizes.insert(size.clone());
        }
        for tag in &self.tags {
            filters.tags.insert(tag.clone());
        }
        filters.set_sort(self.sort, self.order);
        if let Some(id) = self.subcategory {
            filters.select_subcategory(id);
        }

        filters
    }
}

fn parse_bound(flag: &str, input: Option<&str>) -> Option<Decimal> {
    let input = input?;
    let parsed = parse_price_input(input);
    if parsed.is_none() {
        tracing::warn!(flag, input, "Ignoring price that is not a non-negative number");
    }
    parsed
}

/// Fetch the category page and print the derived listing to stdout.
///
/// # Errors
///
/// Returns an error if configuration is missing, the catalogue API request
/// fails, or stdout cannot be written.
pub async fn run(args: &BrowseArgs) -> Result<(), CommandError> {
    let client = catalogue_client()?;
    let page_size = args.page_size.unwrap_or_else(|| client.default_page_size());
    let page = client
        .fetch_category(args.category, args.page, page_size)
        .await?;

    let filters = args.filter_state();
    let products = filters.apply(&page.products);
    tracing::info!(
        fetched = page.products.len(),
        visible = products.len(),
        "Derived listing"
    );

    let mut out = io::stdout().lock();
    if args.json {
        let listing = Listing::new(&page, &filters, products);
        serde_json::to_writer_pretty(&mut out, &listing)?;
        writeln!(out)?;
    } else {
        write_listing(&mut out, &page, &products)?;
    }

    Ok(())
}

/// JSON shape of `atelier browse --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Listing<'a> {
    category_id: CategoryId,
    category: &'a str,
    page: u32,
    total_pages: u32,
    filters: &'a FilterState,
    total: usize,
    visible: usize,
    products: Vec<&'a Product>,
}

impl<'a> Listing<'a> {
    fn new(page: &'a CategoryPage, filters: &'a FilterState, products: Vec<&'a Product>) -> Self {
        Self {
            category_id: page.category.id,
            category: &page.category.name,
            page: page.page,
            total_pages: page.total_pages(),
            filters,
            total: page.products.len(),
            visible: products.len(),
            products,
        }
    }
}

/// Write the listing as an aligned table.
fn write_listing(
    out: &mut impl Write,
    page: &CategoryPage,
    products: &[&Product],
) -> io::Result<()> {
    writeln!(
        out,
        "{} (page {} of {}): {} of {} products",
        page.category.name,
        page.page,
        page.total_pages(),
        products.len(),
        page.products.len()
    )?;

    if products.is_empty() {
        writeln!(out, "No products found.")?;
        return Ok(());
    }

    for product in products {
        let mut attributes: Vec<&str> = Vec::new();
        attributes.extend(product.colors.iter().map(String::as_str));
        attributes.extend(product.sizes.iter().map(String::as_str));

        write!(
            out,
            "{:>8}  {:>10}  {}",
            product.id,
            product.price.display(),
            product.name
        )?;
        if !attributes.is_empty() {
            write!(out, "  [{}]", attributes.join(", "))?;
        }
        if let Some(seller) = &product.seller {
            write!(out, "  by {}", seller.display_name)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use atelier_core::{Category, CurrencyCode, Price, ProductId};
    use chrono::{TimeZone, Utc};
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: BrowseArgs,
    }

    fn parse(argv: &[&str]) -> BrowseArgs {
        let mut full = vec!["atelier"];
        full.extend_from_slice(argv);
        TestCli::try_parse_from(full).unwrap().args
    }

    fn product(id: i64, price: i64, sizes: &[&str], day: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Dress {id}"),
            price: Price::new(Decimal::new(price, 0), CurrencyCode::Eur),
            images: Vec::new(),
            sizes: sizes.iter().map(|s| (*s).to_string()).collect(),
            colors: BTreeSet::new(),
            tags: BTreeSet::new(),
            view_count: 0,
            sales_count: 0,
            created_at: Utc.with_ymd_and_hms(2026, 5, day, 12, 0, 0).unwrap(),
            category_id: CategoryId::new(3),
            seller: None,
        }
    }

    fn page() -> CategoryPage {
        CategoryPage::new(
            Category {
                id: CategoryId::new(3),
                name: "Dresses".to_string(),
                slug: None,
                parent_id: None,
                children: Vec::new(),
                product_count: 2,
            },
            vec![product(1, 50, &["M", "L"], 1), product(2, 150, &["S"], 2)],
            1,
            24,
        )
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["12"]);
        assert_eq!(args.category, CategoryId::new(12));
        assert_eq!(args.page, 1);
        assert_eq!(args.filter_state(), FilterState::default());
        assert!(!args.json);
    }

    #[test]
    fn test_filter_state_from_flags() {
        let args = parse(&[
            "12",
            "--min-price",
            "50",
            "--color",
            "RED",
            "--color",
            "black",
            "--size",
            "M",
            "--sort",
            "price",
            "--order",
            "asc",
            "--subcategory",
            "14",
        ]);
        let filters = args.filter_state();

        assert_eq!(filters.min_price, Some(Decimal::new(50, 0)));
        assert_eq!(filters.max_price, None);
        assert_eq!(filters.colors.len(), 2);
        assert!(filters.sizes.contains("M"));
        assert_eq!(filters.sort, SortKey::Price);
        assert_eq!(filters.order, SortOrder::Asc);
        assert_eq!(filters.subcategory, Some(CategoryId::new(14)));
    }

    #[test]
    fn test_malformed_price_is_inactive() {
        let args = parse(&["12", "--max-price", "cheap", "--min-price", "-5"]);
        let filters = args.filter_state();
        assert_eq!(filters.min_price, None);
        assert_eq!(filters.max_price, None);
    }

    #[test]
    fn test_unknown_sort_is_rejected() {
        assert!(TestCli::try_parse_from(["atelier", "12", "--sort", "rating"]).is_err());
    }

    #[test]
    fn test_write_listing() {
        let page = page();
        let filters = parse(&["3", "--size", "M"]).filter_state();
        let products = filters.apply(&page.products);

        let mut out = Vec::new();
        write_listing(&mut out, &page, &products).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Dresses (page 1 of 1): 1 of 2 products\n"));
        assert!(text.contains("Dress 1  [L, M]"));
        assert!(text.contains("€50.00"));
        assert!(!text.contains("Dress 2"));
    }

    #[test]
    fn test_write_listing_empty() {
        let page = page();
        let mut out = Vec::new();
        write_listing(&mut out, &page, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("No products found.\n"));
    }

    #[test]
    fn test_json_listing() {
        let page = page();
        let filters = parse(&["3", "--sort", "price", "--order", "asc"]).filter_state();
        let listing = Listing::new(&page, &filters, filters.apply(&page.products));
        let json = serde_json::to_value(&listing).unwrap();

        assert_eq!(json["categoryId"], 3);
        assert_eq!(json["visible"], 2);
        assert_eq!(json["products"][0]["id"], 1);
        assert_eq!(json["products"][1]["id"], 2);
    }
}
