// ABOUTME: Composite quality score in [0, 10] used to rank aggregated food candidates
// ABOUTME: Weighs completeness, source trust, query relevance, serving plausibility and metadata
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Quality scoring
//!
//! | component    | weight | signal                                             |
//! |--------------|--------|----------------------------------------------------|
//! | completeness | 3      | share of name, calories, protein, carbs, fat set   |
//! | source       | 2      | source priority / max priority                     |
//! | relevance    | 3      | query match tiers plus basic/processed adjustments |
//! | serving      | 1      | serving between 10 and 1000 g/ml                   |
//! | metadata     | 1      | brand or barcode present                           |
//!
//! A name matching the non-food list collapses the whole score to 0.1.

use serde::Serialize;
use std::sync::Arc;

use crate::classifier::FoodClassifier;
use larder_core::constants::scoring::{
    BASIC_BRANDED_BONUS, BASIC_UNBRANDED_BONUS, BRAND_CONTAINS, BRAND_WORD_OVERLAP,
    COMPLETENESS_WEIGHT, EXACT_BASIC_MATCH, EXACT_MATCH, MAX_REASONABLE_SERVING, MAX_SCORE,
    METADATA_WEIGHT, MIN_REASONABLE_SERVING, NAME_CONTAINS, NAME_WORD_OVERLAP, NON_FOOD_SCORE,
    PREFIX_MATCH, PROCESSED_PENALTY, RELEVANCE_WEIGHT, SERVING_WEIGHT, SOURCE_WEIGHT,
};
use larder_core::constants::source_priority;
use larder_core::models::FoodRecord;

/// Weighted score components for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// Completeness contribution, 0 to 3
    pub completeness: f64,
    /// Source trust contribution, 0 to 2
    pub source: f64,
    /// Query relevance contribution, 0 to 3
    pub relevance: f64,
    /// Serving plausibility contribution, 0 or 1
    pub serving: f64,
    /// Brand/barcode contribution, 0 or 1
    pub metadata: f64,
    /// Whether the non-food veto fired
    pub non_food: bool,
    /// Final score in [0, 10]
    pub total: f64,
}

/// Scores candidates against an optional query
#[derive(Debug, Clone)]
pub struct QualityScorer {
    classifier: Arc<FoodClassifier>,
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self::new(Arc::new(FoodClassifier::default()))
    }
}

impl QualityScorer {
    /// Create a scorer over the given classifier
    #[must_use]
    pub const fn new(classifier: Arc<FoodClassifier>) -> Self {
        Self { classifier }
    }

    /// Classifier in use
    #[must_use]
    pub fn classifier(&self) -> &FoodClassifier {
        &self.classifier
    }

    /// Score one candidate
    #[must_use]
    pub fn score(&self, record: &FoodRecord, query: Option<&str>) -> f64 {
        self.breakdown(record, query).total
    }

    /// Score one candidate, keeping each weighted component
    #[must_use]
    pub fn breakdown(&self, record: &FoodRecord, query: Option<&str>) -> ScoreBreakdown {
        let completeness = completeness(record) * COMPLETENESS_WEIGHT;
        let source = f64::from(record.source.priority()) / f64::from(source_priority::MAX)
            * SOURCE_WEIGHT;
        let relevance = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map_or(0.0, |q| self.relevance(record, q) * RELEVANCE_WEIGHT);
        let grams = record.serving.grams_equivalent();
        let serving = if (MIN_REASONABLE_SERVING..=MAX_REASONABLE_SERVING).contains(&grams) {
            SERVING_WEIGHT
        } else {
            0.0
        };
        let metadata = if record.has_brand() || record.has_barcode() {
            METADATA_WEIGHT
        } else {
            0.0
        };

        let non_food = self.classifier.is_non_food(&record.name);
        let total = if non_food {
            NON_FOOD_SCORE
        } else {
            (completeness + source + relevance + serving + metadata).clamp(0.0, MAX_SCORE)
        };

        ScoreBreakdown {
            completeness,
            source,
            relevance,
            serving,
            metadata,
            non_food,
            total,
        }
    }

    /// Attach a quality score to every record
    #[must_use]
    pub fn score_all(&self, records: Vec<FoodRecord>, query: Option<&str>) -> Vec<FoodRecord> {
        records
            .into_iter()
            .map(|mut record| {
                record.quality_score = Some(self.score(&record, query));
                record
            })
            .collect()
    }

    /// Unweighted relevance in [0, 1]
    ///
    /// The exact-match tier may reach 1.2 and the bonuses stack on top; the clamp happens
    /// once, after every adjustment.
    fn relevance(&self, record: &FoodRecord, query: &str) -> f64 {
        let query = query.to_lowercase();
        let name = record.name.to_lowercase();
        let brand = record.brand.as_deref().unwrap_or_default().to_lowercase();
        let branded = record.has_brand();
        let basic = self.classifier.is_basic(&record.name);

        let mut relevance = if name == query {
            if basic && !branded {
                EXACT_BASIC_MATCH
            } else {
                EXACT_MATCH
            }
        } else if name.starts_with(&format!("{query} ")) {
            PREFIX_MATCH
        } else if name.contains(&query) {
            NAME_CONTAINS
        } else if !brand.is_empty() && brand.contains(&query) {
            BRAND_CONTAINS
        } else {
            word_overlap(&query, &name, &brand)
        };

        if basic {
            relevance += if branded {
                BASIC_BRANDED_BONUS
            } else {
                BASIC_UNBRANDED_BONUS
            };
        }
        if self.classifier.is_basic(&query) && self.classifier.is_processed(&record.name) {
            relevance -= PROCESSED_PENALTY;
        }

        relevance.clamp(0.0, 1.0)
    }
}

/// Share of {name, calories, protein, carbs, fat} that are present, in [0, 1]
fn completeness(record: &FoodRecord) -> f64 {
    let nutrition = &record.nutrition;
    let present = [
        !record.name.trim().is_empty(),
        nutrition.calories_per_serving > 0.0,
        nutrition.protein_grams > 0.0,
        nutrition.carbs_grams > 0.0,
        nutrition.fat_grams > 0.0,
    ]
    .iter()
    .filter(|p| **p)
    .count();
    present as f64 / 5.0
}

fn word_overlap(query: &str, name: &str, brand: &str) -> f64 {
    let words: Vec<&str> = query.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }
    let total = words.len() as f64;
    let in_name = words.iter().filter(|w| name.contains(**w)).count() as f64;
    let in_brand = if brand.is_empty() {
        0.0
    } else {
        words.iter().filter(|w| brand.contains(**w)).count() as f64
    };
    (NAME_WORD_OVERLAP * in_name / total).max(BRAND_WORD_OVERLAP * in_brand / total)
}
