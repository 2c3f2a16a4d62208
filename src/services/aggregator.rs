// ABOUTME: Concurrent fan-out over every configured food source with settle-all semantics
// ABOUTME: Per-source timeout and circuit breaker, optional overall deadline, ordered barcode fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Source aggregation
//!
//! A search calls every configured text-search source at once, each with its own share of
//! the limit, its own timeout and its own circuit breaker. Failures turn into an empty
//! batch plus a warning; nothing a single source does can fail or stall the others.
//! With an overall deadline set, whatever has arrived when it fires is kept.

use futures_util::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, info, warn};

use larder_core::constants::search::DEFAULT_ADAPTER_TIMEOUT_MS;
use larder_core::models::{FoodRecord, FoodSource};
use larder_sources::{
    CircuitBreaker, CircuitBreakerConfig, FoodDataSource, ProviderError, ProviderResult,
};

/// Order in which barcode lookups are attempted, most barcode-reliable first
#[must_use]
pub const fn barcode_priority(source: FoodSource) -> u8 {
    match source {
        FoodSource::Local => 0,
        FoodSource::OpenFoodFacts => 1,
        FoodSource::Nutritionix => 2,
        FoodSource::Usda => 3,
        FoodSource::Unknown => 4,
    }
}

struct RegisteredSource {
    source: Arc<dyn FoodDataSource>,
    breaker: CircuitBreaker,
}

/// Fans queries out to registered sources
pub struct SourceAggregator {
    sources: Vec<RegisteredSource>,
    adapter_timeout: Duration,
    request_timeout: Option<Duration>,
    breaker_config: CircuitBreakerConfig,
}

impl Default for SourceAggregator {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_ADAPTER_TIMEOUT_MS))
    }
}

impl SourceAggregator {
    /// Create an empty aggregator with the given per-source timeout
    #[must_use]
    pub fn new(adapter_timeout: Duration) -> Self {
        Self {
            sources: Vec::new(),
            adapter_timeout,
            request_timeout: None,
            breaker_config: CircuitBreakerConfig::default(),
        }
    }

    /// Set the overall deadline for one search
    #[must_use]
    pub fn with_request_timeout(mut self, request_timeout: Option<Duration>) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Thresholds used for breakers of sources registered after this call
    #[must_use]
    pub fn with_breaker_config(mut self, config: CircuitBreakerConfig) -> Self {
        self.breaker_config = config;
        self
    }

    /// Register a source; registration order is the order batches are concatenated in
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn FoodDataSource>) -> Self {
        self.register(source);
        self
    }

    /// Register a source
    pub fn register(&mut self, source: Arc<dyn FoodDataSource>) {
        let breaker = CircuitBreaker::with_config(source.name(), self.breaker_config.clone());
        debug!(
            source = source.name(),
            configured = source.is_configured(),
            "Registered food source"
        );
        self.sources.push(RegisteredSource { source, breaker });
    }

    /// Names of registered sources in registration order
    #[must_use]
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.source.name()).collect()
    }

    /// Number of registered sources
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether no sources are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Per-source result share for a limit spread over `sources` searchers
    #[must_use]
    pub const fn per_source_limit(limit: usize, sources: usize) -> usize {
        if sources == 0 {
            return 0;
        }
        let share = limit.div_ceil(sources);
        if share == 0 {
            1
        } else {
            share
        }
    }

    /// Search every configured text-search source and concatenate their batches
    ///
    /// Never fails: failed, timed-out or short-circuited sources contribute nothing.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<FoodRecord> {
        let searchers: Vec<(usize, &RegisteredSource)> = self
            .sources
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                entry.source.capabilities().supports_search() && entry.source.is_configured()
            })
            .collect();
        if searchers.is_empty() {
            debug!(query, "No configured search sources");
            return Vec::new();
        }

        let share = Self::per_source_limit(limit, searchers.len());
        let mut pending: FuturesUnordered<_> = searchers
            .into_iter()
            .map(|(index, entry)| async move { (index, self.search_one(entry, query, share).await) })
            .collect();

        let deadline = self.request_timeout.map(|t| Instant::now() + t);
        let mut batches: Vec<(usize, Vec<FoodRecord>)> = Vec::new();
        loop {
            let next = match deadline {
                Some(deadline) => timeout_at(deadline, pending.next()).await,
                None => Ok(pending.next().await),
            };
            match next {
                Ok(Some(batch)) => batches.push(batch),
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        query,
                        abandoned = pending.len(),
                        "Search deadline reached, continuing with partial results"
                    );
                    break;
                }
            }
        }

        batches.sort_by_key(|(index, _)| *index);
        let candidates: Vec<FoodRecord> = batches.into_iter().flat_map(|(_, b)| b).collect();
        debug!(query, candidates = candidates.len(), "Aggregated candidates");
        candidates
    }

    /// Look a barcode up source by source in barcode priority order; first hit wins
    pub async fn lookup_barcode(&self, barcode: &str) -> Option<FoodRecord> {
        let mut lookups: Vec<&RegisteredSource> = self
            .sources
            .iter()
            .filter(|entry| {
                entry.source.capabilities().supports_barcode() && entry.source.is_configured()
            })
            .collect();
        lookups.sort_by_key(|entry| barcode_priority(entry.source.source()));

        for entry in lookups {
            let name = entry.source.name();
            match self.guarded(entry, entry.source.lookup_barcode(barcode)).await {
                Ok(Some(record)) => {
                    info!(source = name, barcode, id = %record.id, "Barcode found");
                    return Some(record);
                }
                Ok(None) => debug!(source = name, barcode, "Barcode not known to source"),
                Err(error) => log_failure(name, barcode, &error),
            }
        }
        None
    }

    async fn search_one(
        &self,
        entry: &RegisteredSource,
        query: &str,
        share: usize,
    ) -> Vec<FoodRecord> {
        let name = entry.source.name();
        match self.guarded(entry, entry.source.search(query, share)).await {
            Ok(records) => {
                debug!(source = name, count = records.len(), "Source returned candidates");
                records
            }
            Err(error) => {
                log_failure(name, query, &error);
                Vec::new()
            }
        }
    }

    /// Run a source call under its timeout and circuit breaker
    async fn guarded<T, F>(&self, entry: &RegisteredSource, operation: F) -> ProviderResult<T>
    where
        F: Future<Output = ProviderResult<T>>,
    {
        let timeout_ms = u64::try_from(self.adapter_timeout.as_millis()).unwrap_or(u64::MAX);
        entry
            .breaker
            .call(async {
                timeout(self.adapter_timeout, operation)
                    .await
                    .unwrap_or_else(|_| {
                        Err(ProviderError::Timeout {
                            provider: entry.source.name().to_owned(),
                            timeout_ms,
                        })
                    })
            })
            .await
    }
}

fn log_failure(source: &str, query: &str, error: &ProviderError) {
    if error.is_configuration_gap() {
        debug!(source, query, "Source not configured, skipping");
    } else {
        warn!(source, query, error = %error, "Food source failed, continuing without it");
    }
}
