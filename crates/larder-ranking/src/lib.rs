// ABOUTME: Ranking pipeline for aggregated food candidates
// ABOUTME: Keyword classifiers, quality scorer, deduplicator and deterministic ranker
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Larder Ranking
//!
//! Pure, synchronous stages applied after aggregation:
//!
//! 1. [`QualityScorer`] attaches a score in `[0, 10]` to every candidate
//! 2. [`deduplicate`] drops low scores and collapses same-product groups
//! 3. [`rank`] orders the survivors and truncates to the caller's limit
//!
//! Keyword lists are plain data injected through [`FoodClassifier`], so tests can
//! substitute their own.

#![deny(unsafe_code)]

/// Keyword-driven non-food, basic and processed classification
pub mod classifier;
/// Barcode and fuzzy-name deduplication
pub mod dedup;
/// Built-in keyword lists and JSON overrides
pub mod keywords;
/// Final ordering and truncation
pub mod ranking;
/// Composite quality score
pub mod scoring;

pub use classifier::FoodClassifier;
pub use dedup::{deduplicate, name_similarity, normalize_name};
pub use keywords::KeywordLists;
pub use ranking::rank;
pub use scoring::{QualityScorer, ScoreBreakdown};
