// ABOUTME: Food search entry points: text search pipeline and barcode lookup
// ABOUTME: Aggregates sources, then scores, deduplicates, ranks and truncates candidates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::config::LarderConfig;
use crate::services::aggregator::SourceAggregator;
use larder_core::constants::search::DEFAULT_MAX_RESULTS;
use larder_core::errors::AppResult;
use larder_core::models::FoodRecord;
use larder_ranking::{deduplicate, rank, FoodClassifier, KeywordLists, QualityScorer, ScoreBreakdown};
use larder_sources::{
    initialize_shared_client, InMemoryCustomFoods, LocalFoodSource, NutritionixSource,
    OpenFoodFactsSource, UsdaSource,
};

/// A ranked record with the components of its score
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredFood {
    /// The ranked record
    #[serde(flatten)]
    pub record: FoodRecord,
    /// How its quality score was assembled
    pub score_breakdown: ScoreBreakdown,
}

/// Food search service used by the HTTP layer and the CLI
pub struct FoodSearchService {
    aggregator: SourceAggregator,
    scorer: QualityScorer,
    max_results: usize,
}

impl FoodSearchService {
    /// Create a service over an aggregator and scorer
    #[must_use]
    pub fn new(aggregator: SourceAggregator, scorer: QualityScorer) -> Self {
        Self {
            aggregator,
            scorer,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Cap on the caller's limit
    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Build the service and every source from configuration
    ///
    /// Sources are registered in trust order: local, USDA, Nutritionix, Open Food Facts.
    /// Sources without credentials are still registered and skipped at search time.
    ///
    /// # Errors
    ///
    /// Returns an error if the custom foods or keyword file is set but unreadable
    pub fn from_config(config: &LarderConfig) -> AppResult<Self> {
        initialize_shared_client(
            config.http_client.timeout_secs,
            config.http_client.connect_timeout_secs,
        );

        let keywords = match &config.keywords_path {
            Some(path) => KeywordLists::from_json_file(path)?,
            None => KeywordLists::default(),
        };
        let scorer = QualityScorer::new(Arc::new(FoodClassifier::new(keywords)));

        let local = match &config.custom_foods_path {
            Some(path) => LocalFoodSource::new(Arc::new(InMemoryCustomFoods::from_json_file(path)?)),
            None => LocalFoodSource::unconfigured(),
        };

        let aggregator = SourceAggregator::new(config.search.adapter_timeout)
            .with_request_timeout(config.search.request_timeout)
            .with_source(Arc::new(local))
            .with_source(Arc::new(UsdaSource::new(config.usda.clone())))
            .with_source(Arc::new(NutritionixSource::new(config.nutritionix.clone())))
            .with_source(Arc::new(OpenFoodFactsSource::new(
                config.open_food_facts.clone(),
            )));

        info!(sources = ?aggregator.source_names(), "Food search service ready");
        Ok(Self::new(aggregator, scorer).with_max_results(config.search.max_results))
    }

    /// Scorer in use
    #[must_use]
    pub const fn scorer(&self) -> &QualityScorer {
        &self.scorer
    }

    /// Text search across all sources, scored, deduplicated, ranked and truncated
    ///
    /// A blank query or a zero limit yields an empty list without calling any source.
    /// An empty list means nothing matched; it is never an error.
    #[instrument(skip(self))]
    pub async fn search_foods(&self, query: &str, limit: usize) -> Vec<FoodRecord> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            debug!("Empty query or zero limit, nothing to search");
            return Vec::new();
        }
        let limit = limit.min(self.max_results);

        let candidates = self.aggregator.search(query, limit).await;
        let fetched = candidates.len();
        let scored = self.scorer.score_all(candidates, Some(query));
        let unique = deduplicate(scored);
        let survivors = unique.len();
        let ranked = rank(unique, limit);

        info!(
            fetched,
            survivors,
            returned = ranked.len(),
            "Food search completed"
        );
        ranked
    }

    /// Like [`Self::search_foods`] with each record's score breakdown attached
    pub async fn search_foods_explained(&self, query: &str, limit: usize) -> Vec<ScoredFood> {
        let ranked = self.search_foods(query, limit).await;
        let query = query.trim();
        ranked
            .into_iter()
            .map(|record| ScoredFood {
                score_breakdown: self.scorer.breakdown(&record, Some(query)),
                record,
            })
            .collect()
    }

    /// Single-record barcode lookup, no scoring
    ///
    /// Sources are tried in barcode priority order and the first hit wins.
    #[instrument(skip(self))]
    pub async fn get_food_by_barcode(&self, barcode: &str) -> Option<FoodRecord> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            debug!("Blank barcode, nothing to look up");
            return None;
        }
        self.aggregator.lookup_barcode(barcode).await
    }
}
