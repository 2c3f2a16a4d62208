// ABOUTME: End-to-end tests for the food search service over stub sources
// ABOUTME: Full pipeline ordering, result limits, input guards and barcode priority
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use std::io::Write;
use std::time::Duration;

use common::{food, init_test_logging, names, StubFailure, StubSource};
use larder::config::LarderConfig;
use larder::models::FoodSource;
use larder::ranking::QualityScorer;
use larder::services::{FoodSearchService, SourceAggregator};

fn service(aggregator: SourceAggregator) -> FoodSearchService {
    init_test_logging();
    FoodSearchService::new(aggregator, QualityScorer::default())
}

fn apple_service() -> FoodSearchService {
    let aggregator = SourceAggregator::new(Duration::from_secs(2))
        .with_source(
            StubSource::new("usda", FoodSource::Usda)
                .returning(vec![food(FoodSource::Usda, "171688", "Apple")])
                .into_arc(),
        )
        .with_source(
            StubSource::new("nutritionix", FoodSource::Nutritionix)
                .returning(vec![food(FoodSource::Nutritionix, "nx1", "Apple Juice")
                    .with_brand(Some("Tropicana".to_owned()))])
                .into_arc(),
        )
        .with_source(
            StubSource::new("openFoodFacts", FoodSource::OpenFoodFacts)
                .returning(vec![food(FoodSource::OpenFoodFacts, "off1", "Apple")])
                .into_arc(),
        );
    service(aggregator)
}

#[tokio::test]
async fn test_apple_search_end_to_end() {
    let results = apple_service().search_foods("apple", 10).await;

    assert_eq!(names(&results), vec!["Apple", "Apple Juice"]);
    assert_eq!(results[0].source, FoodSource::Usda);
    assert!((results[0].score() - 8.6).abs() < 1e-9);
    assert!((results[1].score() - 8.4).abs() < 1e-9);
}

#[tokio::test]
async fn test_explained_results_carry_breakdown() {
    let results = apple_service().search_foods_explained("  apple ", 10).await;
    assert_eq!(results.len(), 2);
    let top = &results[0];
    assert!((top.score_breakdown.total - top.record.score()).abs() < 1e-9);
    assert!(!top.score_breakdown.non_food);

    let json = serde_json::to_value(top).unwrap();
    assert_eq!(json["name"], "Apple");
    assert!(json["scoreBreakdown"]["relevance"].is_number());
}

#[tokio::test]
async fn test_result_count_never_exceeds_limit() {
    let records: Vec<_> = (1..=25)
        .map(|i| food(FoodSource::Usda, &i.to_string(), &format!("Rice {i}")))
        .collect();
    let usda = StubSource::new("usda", FoodSource::Usda)
        .returning(records)
        .into_arc();
    let service = service(SourceAggregator::new(Duration::from_secs(2)).with_source(usda));

    assert_eq!(service.search_foods("rice", 5).await.len(), 5);
}

#[tokio::test]
async fn test_limit_is_capped_by_max_results() {
    let records: Vec<_> = (1..=25)
        .map(|i| food(FoodSource::Usda, &i.to_string(), &format!("Bean {i}")))
        .collect();
    let usda = StubSource::new("usda", FoodSource::Usda)
        .returning(records)
        .into_arc();
    let service = service(SourceAggregator::new(Duration::from_secs(2)).with_source(usda.clone()))
        .with_max_results(3);

    assert_eq!(service.search_foods("bean", 100).await.len(), 3);
    assert_eq!(usda.last_limit(), 3);
}

#[tokio::test]
async fn test_blank_query_and_zero_limit_skip_sources() {
    let usda = StubSource::new("usda", FoodSource::Usda)
        .returning(vec![food(FoodSource::Usda, "1", "Egg")])
        .into_arc();
    let service = service(SourceAggregator::new(Duration::from_secs(2)).with_source(usda.clone()));

    assert!(service.search_foods("   ", 10).await.is_empty());
    assert!(service.search_foods("egg", 0).await.is_empty());
    assert_eq!(usda.search_calls(), 0);
}

#[tokio::test]
async fn test_all_sources_failing_is_not_an_error() {
    let aggregator = SourceAggregator::new(Duration::from_secs(2))
        .with_source(
            StubSource::new("usda", FoodSource::Usda)
                .failing(StubFailure::ServerError)
                .into_arc(),
        )
        .with_source(
            StubSource::new("openFoodFacts", FoodSource::OpenFoodFacts)
                .failing(StubFailure::Network)
                .into_arc(),
        );
    assert!(service(aggregator).search_foods("egg", 10).await.is_empty());
}

#[tokio::test]
async fn test_non_food_is_filtered_out() {
    let usda = StubSource::new("usda", FoodSource::Usda)
        .returning(vec![
            food(FoodSource::Usda, "1", "Coffee"),
            food(FoodSource::Usda, "2", "Coffee Mug"),
        ])
        .into_arc();
    let service = service(SourceAggregator::new(Duration::from_secs(2)).with_source(usda));
    assert_eq!(names(&service.search_foods("coffee", 10).await), vec!["Coffee"]);
}

#[tokio::test]
async fn test_barcode_priority_across_sources() {
    let code = "0012000161155";
    let tagged = |source: FoodSource, id: &str| food(source, id, "Sparkling Water").with_barcode(Some(code.to_owned()));

    let usda = StubSource::new("usda", FoodSource::Usda).with_barcode(tagged(FoodSource::Usda, "u")).into_arc();
    let nix = StubSource::new("nutritionix", FoodSource::Nutritionix).with_barcode(tagged(FoodSource::Nutritionix, "n")).into_arc();
    let off = StubSource::new("openFoodFacts", FoodSource::OpenFoodFacts).with_barcode(tagged(FoodSource::OpenFoodFacts, "o")).into_arc();
    let local = StubSource::new("local", FoodSource::Local).with_barcode(tagged(FoodSource::Local, "l")).into_arc();

    let everything = service(
        SourceAggregator::new(Duration::from_secs(2))
            .with_source(usda.clone())
            .with_source(nix.clone())
            .with_source(off.clone())
            .with_source(local),
    );
    let found = everything.get_food_by_barcode(code).await.unwrap();
    assert_eq!(found.source, FoodSource::Local);
    assert!(found.quality_score.is_none());

    let without_local = service(
        SourceAggregator::new(Duration::from_secs(2))
            .with_source(usda.clone())
            .with_source(nix.clone())
            .with_source(off),
    );
    let found = without_local.get_food_by_barcode(&format!(" {code} ")).await.unwrap();
    assert_eq!(found.source, FoodSource::OpenFoodFacts);

    let last_resort = service(
        SourceAggregator::new(Duration::from_secs(2))
            .with_source(usda)
            .with_source(nix),
    );
    let found = last_resort.get_food_by_barcode(code).await.unwrap();
    assert_eq!(found.source, FoodSource::Nutritionix);
}

#[tokio::test]
async fn test_blank_barcode_returns_none() {
    let local = StubSource::new("local", FoodSource::Local).into_arc();
    let service = service(SourceAggregator::new(Duration::from_secs(2)).with_source(local.clone()));
    assert!(service.get_food_by_barcode("  ").await.is_none());
    assert_eq!(local.barcode_calls(), 0);
}

#[tokio::test]
async fn test_from_config_loads_custom_foods() {
    init_test_logging();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"id": "c1", "name": "Grandma's Granola", "barcode": "111222333", "calories": 450, "proteinG": 10, "carbsG": 60, "fatG": 18}}]"#
    )
    .unwrap();

    let config = LarderConfig {
        custom_foods_path: Some(file.path().to_path_buf()),
        open_food_facts: larder::sources::OpenFoodFactsConfig {
            enabled: false,
            ..Default::default()
        },
        ..LarderConfig::default()
    };
    let service = FoodSearchService::from_config(&config).unwrap();

    let results = service.search_foods("granola", 5).await;
    assert_eq!(names(&results), vec!["Grandma's Granola"]);
    assert_eq!(results[0].source, FoodSource::Local);

    let found = service.get_food_by_barcode("111222333").await.unwrap();
    assert_eq!(found.id, "local_c1");
}

#[test]
fn test_from_config_rejects_missing_custom_foods_file() {
    let config = LarderConfig {
        custom_foods_path: Some("/nonexistent/larder/foods.json".into()),
        ..LarderConfig::default()
    };
    assert!(FoodSearchService::from_config(&config).is_err());
}
