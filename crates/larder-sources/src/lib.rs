// ABOUTME: Food data source adapters for USDA, Nutritionix, Open Food Facts and custom foods
// ABOUTME: Core source trait, circuit breaker, shared HTTP client and payload parsing helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Food data source adapters and core abstractions.
//!
//! Every external provider is a [`FoodDataSource`]: it fetches raw results and maps them
//! to canonical [`larder_core::models::FoodRecord`]s with nutrition scaled to the declared
//! serving. Adapters report failures as [`ProviderError`]; turning those into empty
//! batches is the aggregator's job.

pub use larder_core::constants;
pub use larder_core::errors;
pub use larder_core::models;

/// Circuit breaker guarding each source
pub mod circuit_breaker;
/// Shared HTTP client for provider API calls
pub mod http_client;
/// Custom (user-curated) foods source
pub mod local;
/// Nutritionix adapter
pub mod nutritionix;
/// Open Food Facts adapter
pub mod open_food_facts;
/// Core source trait and capabilities
pub mod source;
/// USDA `FoodData` Central adapter
pub mod usda;
/// Serving-text parsing, energy conversion and per-serving scaling
pub mod utils;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use http_client::{initialize_shared_client, shared_client};
pub use larder_core::errors::provider::{ProviderError, ProviderResult};
pub use local::{CustomFood, CustomFoodStore, InMemoryCustomFoods, LocalFoodSource};
pub use nutritionix::{NutritionixConfig, NutritionixSource};
pub use open_food_facts::{OpenFoodFactsConfig, OpenFoodFactsSource};
pub use source::{FoodDataSource, SourceCapabilities};
pub use usda::{UsdaConfig, UsdaSource};
