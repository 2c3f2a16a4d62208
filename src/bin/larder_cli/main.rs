// ABOUTME: Larder CLI - search foods across every configured source from the command line
// ABOUTME: Text search with optional score breakdown and single-record barcode lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Search every configured source
//! larder-cli search "greek yogurt" --limit 5
//!
//! # Show how each result was scored
//! larder-cli search apple --explain
//!
//! # Human-readable table instead of JSON
//! larder-cli search oats --table
//!
//! # Look a product up by barcode
//! larder-cli barcode 3017620422003
//! ```
//!
//! Results are printed to stdout; logs go to stderr.

mod display;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use larder::config::LarderConfig;
use larder::constants::search::DEFAULT_LIMIT;
use larder::logging::LoggingConfig;
use larder::services::FoodSearchService;

#[derive(Parser)]
#[command(
    name = "larder-cli",
    about = "Larder food search CLI",
    long_about = "Search USDA, Nutritionix, Open Food Facts and custom foods at once, with quality scoring, deduplication and ranking."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Search foods by free text
    Search {
        /// Search text
        query: String,

        /// Maximum number of results
        #[arg(long, short = 'l', default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Include the score breakdown of each result
        #[arg(long)]
        explain: bool,

        /// Print a table instead of JSON
        #[arg(long, conflicts_with = "explain")]
        table: bool,
    },

    /// Look a product up by barcode
    Barcode {
        /// GTIN/UPC/EAN barcode
        code: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    logging.init()?;

    let config = LarderConfig::from_env().context("invalid configuration")?;
    let service = FoodSearchService::from_config(&config).context("failed to build sources")?;

    match cli.command {
        Command::Search {
            query,
            limit,
            explain,
            table,
        } => {
            if explain {
                let results = service.search_foods_explained(&query, limit).await;
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                let results = service.search_foods(&query, limit).await;
                if table {
                    display::print_table(&results);
                } else {
                    println!("{}", serde_json::to_string_pretty(&results)?);
                }
            }
        }
        Command::Barcode { code } => match service.get_food_by_barcode(&code).await {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => {
                info!(barcode = %code, "No source knows this barcode");
                println!("null");
            }
        },
    }

    Ok(())
}
