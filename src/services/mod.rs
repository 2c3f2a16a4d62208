// ABOUTME: Service layer orchestrating sources and the ranking pipeline
// ABOUTME: Source aggregation and the public food search entry points
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Concurrent source fan-out and barcode fallback
pub mod aggregator;
/// Text search and barcode lookup entry points
pub mod food_search;

pub use aggregator::{barcode_priority, SourceAggregator};
pub use food_search::{FoodSearchService, ScoredFood};
