// ABOUTME: Shared test utilities for service-level integration tests
// ABOUTME: Quiet logging setup and a scriptable in-memory food source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::unwrap_used
)]
//! Shared test utilities for `larder`

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use larder::models::{FoodRecord, FoodSource, NutritionFacts, Serving};
use larder::sources::{FoodDataSource, ProviderError, ProviderResult, SourceCapabilities};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// What a stub answers to a search
#[derive(Clone)]
pub enum StubReply {
    Records(Vec<FoodRecord>),
    Fail(StubFailure),
}

/// Failure kinds a stub can simulate
#[derive(Clone, Copy)]
pub enum StubFailure {
    ServerError,
    Network,
    NotConfigured,
}

impl StubFailure {
    fn to_error(self, provider: &str) -> ProviderError {
        match self {
            Self::ServerError => ProviderError::ApiError {
                provider: provider.to_owned(),
                status: 503,
                message: "unavailable".to_owned(),
            },
            Self::Network => ProviderError::Network {
                provider: provider.to_owned(),
                message: "connection refused".to_owned(),
            },
            Self::NotConfigured => ProviderError::NotConfigured {
                provider: provider.to_owned(),
            },
        }
    }
}

/// Scriptable food source
pub struct StubSource {
    name: &'static str,
    source: FoodSource,
    reply: StubReply,
    barcodes: Vec<FoodRecord>,
    delay: Option<Duration>,
    script: Mutex<VecDeque<(StubReply, Option<Duration>)>>,
    configured: bool,
    search_calls: AtomicUsize,
    barcode_calls: AtomicUsize,
    last_limit: AtomicUsize,
}

impl StubSource {
    pub fn new(name: &'static str, source: FoodSource) -> Self {
        Self {
            name,
            source,
            reply: StubReply::Records(Vec::new()),
            barcodes: Vec::new(),
            delay: None,
            script: Mutex::new(VecDeque::new()),
            configured: true,
            search_calls: AtomicUsize::new(0),
            barcode_calls: AtomicUsize::new(0),
            last_limit: AtomicUsize::new(usize::MAX),
        }
    }

    pub fn returning(mut self, records: Vec<FoodRecord>) -> Self {
        self.reply = StubReply::Records(records);
        self
    }

    pub fn failing(mut self, failure: StubFailure) -> Self {
        self.reply = StubReply::Fail(failure);
        self
    }

    pub fn with_barcode(mut self, record: FoodRecord) -> Self {
        self.barcodes.push(record);
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a one-off answer for the next search; later searches fall back to the default
    pub fn then(self, reply: StubReply, delay: Option<Duration>) -> Self {
        self.script.lock().unwrap().push_back((reply, delay));
        self
    }

    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn barcode_calls(&self) -> usize {
        self.barcode_calls.load(Ordering::SeqCst)
    }

    /// Limit passed to the most recent search
    pub fn last_limit(&self) -> usize {
        self.last_limit.load(Ordering::SeqCst)
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl FoodDataSource for StubSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn source(&self) -> FoodSource {
        self.source
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::TEXT_SEARCH | SourceCapabilities::BARCODE_LOOKUP
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn search(&self, _query: &str, limit: usize) -> ProviderResult<Vec<FoodRecord>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.last_limit.store(limit, Ordering::SeqCst);
        let scripted = self.script.lock().unwrap().pop_front();
        let (reply, delay) = scripted.unwrap_or_else(|| (self.reply.clone(), self.delay));
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match &reply {
            StubReply::Records(records) => Ok(records.iter().take(limit).cloned().collect()),
            StubReply::Fail(failure) => Err(failure.to_error(self.name)),
        }
    }

    async fn lookup_barcode(&self, barcode: &str) -> ProviderResult<Option<FoodRecord>> {
        self.barcode_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let StubReply::Fail(failure) = &self.reply {
            return Err(failure.to_error(self.name));
        }
        Ok(self
            .barcodes
            .iter()
            .find(|r| r.barcode.as_deref() == Some(barcode))
            .cloned())
    }
}

/// Record with complete nutrition and a 100 g serving
pub fn food(source: FoodSource, id: &str, name: &str) -> FoodRecord {
    FoodRecord::new(source, id, name)
        .with_nutrition(NutritionFacts {
            calories_per_serving: 52.0,
            protein_grams: 0.3,
            carbs_grams: 14.0,
            fat_grams: 0.2,
            ..NutritionFacts::default()
        })
        .with_serving(Serving::new(100.0, "g"))
}

pub fn names(records: &[FoodRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}
