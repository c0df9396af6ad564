//! Atelier CLI - Browse the marketplace catalogue from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List a category, newest first
//! atelier browse 12
//!
//! # Narrow and reorder, as the category page would
//! atelier browse 12 --min-price 50 --color RED --color black --sort price --order asc
//!
//! # Same listing as JSON
//! atelier browse 12 --size M --json
//!
//! # Show the facet values offered for a category page
//! atelier facets 12
//! ```
//!
//! # Commands
//!
//! - `browse` - Fetch a category page and print the filtered listing
//! - `facets` - Fetch a category page and print its facets
//!
//! Configuration comes from the same environment variables as the storefront
//! (`CATALOGUE_API_URL`, `CATALOGUE_API_TOKEN`, ...), with `.env` support.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::browse::BrowseArgs;
use commands::facets::FacetsArgs;

#[derive(Parser)]
#[command(name = "atelier")]
#[command(author, version, about = "Atelier catalogue CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a category page with filters applied
    Browse(BrowseArgs),
    /// Print the facet values of a category page
    Facets(FacetsArgs),
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Browse(args) => commands::browse::run(&args).await,
        Commands::Facets(args) => commands::facets::run(&args).await,
    }
}
