// ABOUTME: Main library entry point for the Larder food search service
// ABOUTME: Aggregates food data sources and ranks their results for a query or barcode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Larder
//!
//! Food search aggregation: one query fans out to USDA `FoodData` Central, Nutritionix,
//! Open Food Facts and the user's custom foods; the answers are normalized to a single
//! record shape, scored, deduplicated and ranked.
//!
//! ## Architecture
//!
//! - **`larder-core`**: canonical models, unit conversion, errors and constants
//! - **`larder-sources`**: one adapter per provider behind the `FoodDataSource` trait
//! - **`larder-ranking`**: classifiers, quality scorer, deduplicator and ranker
//! - **this crate**: configuration, logging, aggregation and the search service
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use larder::config::LarderConfig;
//! use larder::errors::AppResult;
//! use larder::services::FoodSearchService;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = LarderConfig::from_env()?;
//!     let service = FoodSearchService::from_config(&config)?;
//!
//!     for food in service.search_foods("apple", 5).await {
//!         println!("{} ({})", food.name, food.source);
//!     }
//!     Ok(())
//! }
//! ```

/// Environment configuration
pub mod config;
/// Structured logging setup
pub mod logging;
/// Aggregation and search services
pub mod services;

pub use larder_core::{constants, errors, models, units};
pub use larder_ranking as ranking;
pub use larder_sources as sources;
