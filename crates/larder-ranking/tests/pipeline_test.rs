// ABOUTME: Integration tests for scoring, deduplication and ranking working together
// ABOUTME: Covers the non-food veto, barcode identity, fuzzy threshold, score floor and determinism
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::io::Write;
use std::sync::Arc;

use larder_core::models::{FoodRecord, FoodSource, NutritionFacts, Serving};
use larder_ranking::{deduplicate, rank, FoodClassifier, KeywordLists, QualityScorer};

fn complete(source: FoodSource, id: &str, name: &str) -> FoodRecord {
    FoodRecord::new(source, id, name)
        .with_nutrition(NutritionFacts {
            calories_per_serving: 165.0,
            protein_grams: 31.0,
            carbs_grams: 0.1,
            fat_grams: 3.6,
            ..NutritionFacts::default()
        })
        .with_serving(Serving::new(100.0, "g"))
}

fn pipeline(scorer: &QualityScorer, records: Vec<FoodRecord>, query: &str, limit: usize) -> Vec<FoodRecord> {
    rank(deduplicate(scorer.score_all(records, Some(query))), limit)
}

#[test]
fn test_non_food_scores_exactly_point_one() {
    let scorer = QualityScorer::default();
    let mug = complete(FoodSource::Local, "m", "Coffee Mug")
        .with_brand(Some("Acme".to_owned()))
        .with_barcode(Some("999".to_owned()));
    assert!((scorer.score(&mug, Some("coffee")) - 0.1).abs() < f64::EPSILON);
    assert!(deduplicate(scorer.score_all(vec![mug], Some("coffee"))).is_empty());
}

#[test]
fn test_same_barcode_keeps_higher_score() {
    let scorer = QualityScorer::default();
    let usda = complete(FoodSource::Usda, "1", "Greek Yogurt").with_barcode(Some("0123".to_owned()));
    let off = complete(FoodSource::OpenFoodFacts, "2", "Yogurt grec").with_barcode(Some("0123".to_owned()));
    let out = pipeline(&scorer, vec![off, usda], "greek yogurt", 10);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].source, FoodSource::Usda);
}

#[test]
fn test_fuzzy_threshold() {
    let scorer = QualityScorer::default();
    let merged = pipeline(
        &scorer,
        vec![
            complete(FoodSource::Usda, "1", "Chicken Breast"),
            complete(FoodSource::OpenFoodFacts, "2", "Chicken Breasts"),
        ],
        "chicken",
        10,
    );
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].source, FoodSource::Usda);

    let distinct = pipeline(
        &scorer,
        vec![
            complete(FoodSource::Usda, "1", "Chicken Breast"),
            complete(FoodSource::Usda, "2", "Chicken Thigh"),
        ],
        "chicken",
        10,
    );
    assert_eq!(distinct.len(), 2);
}

#[test]
fn test_empty_candidate_falls_below_floor() {
    let scorer = QualityScorer::default();
    let empty = FoodRecord::new(FoodSource::Unknown, "x", "").with_serving(Serving::new(5000.0, "g"));
    assert!(scorer.score(&empty, Some("apple")).abs() < f64::EPSILON);
    assert!(deduplicate(scorer.score_all(vec![empty], Some("apple"))).is_empty());
}

#[test]
fn test_ranking_is_deterministic() {
    let scorer = QualityScorer::default();
    let candidates = vec![
        complete(FoodSource::OpenFoodFacts, "1", "Salmon Fillet"),
        complete(FoodSource::Usda, "2", "Atlantic Salmon"),
        complete(FoodSource::Nutritionix, "3", "Smoked Salmon").with_brand(Some("Ducktrap".to_owned())),
        complete(FoodSource::Usda, "4", "Salmon"),
        complete(FoodSource::Local, "5", "Salmon Poke Bowl"),
    ];
    let first = pipeline(&scorer, candidates.clone(), "salmon", 10);
    let second = pipeline(&scorer, candidates, "salmon", 10);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(first.len(), 5);
}

#[test]
fn test_keyword_file_drives_scorer() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"non_food": ["gadget"]}}"#).unwrap();
    let lists = KeywordLists::from_json_file(file.path()).unwrap();
    let scorer = QualityScorer::new(Arc::new(FoodClassifier::new(lists)));

    let gadget = complete(FoodSource::Usda, "1", "Kitchen Gadget");
    let mug = complete(FoodSource::Usda, "2", "Coffee Mug");
    assert!((scorer.score(&gadget, None) - 0.1).abs() < f64::EPSILON);
    assert!(scorer.score(&mug, None) > 1.0);
}
