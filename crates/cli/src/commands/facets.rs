//! `atelier facets` - print the facet values of a category page.
//!
//! Facets come from the unfiltered page, so this is the full set of choices
//! the category page offers.

use std::io::{self, Write};

use atelier_core::{CategoryId, Facets};
use clap::Args;

use super::{CommandError, catalogue_client};

/// Arguments for `atelier facets`.
#[derive(Debug, Args)]
pub struct FacetsArgs {
    /// Category ID
    pub category: CategoryId,

    /// Page number (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Fetch the category page and print its facets to stdout.
///
/// # Errors
///
/// Returns an error if configuration is missing, the catalogue API request
/// fails, or stdout cannot be written.
pub async fn run(args: &FacetsArgs) -> Result<(), CommandError> {
    let client = catalogue_client()?;
    let page = client
        .fetch_category(args.category, args.page, client.default_page_size())
        .await?;

    let mut out = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &page.facets)?;
        writeln!(out)?;
    } else {
        write_facets(&mut out, &page.facets)?;
    }

    Ok(())
}

fn write_facets(out: &mut impl Write, facets: &Facets) -> io::Result<()> {
    if facets.is_empty() && facets.price_bounds.is_none() {
        writeln!(out, "No facets: the page has no products.")?;
        return Ok(());
    }

    for (label, values) in [
        ("Colors", &facets.colors),
        ("Sizes", &facets.sizes),
        ("Tags", &facets.tags),
    ] {
        if values.is_empty() {
            writeln!(out, "{label}: -")?;
        } else {
            writeln!(out, "{label}: {}", values.join(", "))?;
        }
    }

    if let Some(bounds) = facets.price_bounds {
        let symbol = bounds.currency_code.symbol();
        writeln!(
            out,
            "Price: {symbol}{:.2} - {symbol}{:.2}",
            bounds.min, bounds.max
        )?;
    }

    Ok(())
}
