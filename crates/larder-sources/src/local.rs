// ABOUTME: Local custom-food source backed by a pluggable store
// ABOUTME: Ships an in-memory store loadable from a JSON file of user-defined foods
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::errors::provider::{ProviderError, ProviderResult};
use crate::models::{FoodRecord, FoodSource, NutritionFacts, Serving};
use crate::source::{FoodDataSource, SourceCapabilities};
use crate::utils::contains_ignore_case;
use larder_core::errors::{AppError, AppResult};

const PROVIDER: &str = "local";

/// A user-defined food; nutrient values are per the declared serving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFood {
    /// Store-assigned id
    pub id: String,
    /// Display name
    pub name: String,
    /// Brand, if any
    #[serde(default)]
    pub brand: Option<String>,
    /// Barcode, if any
    #[serde(default)]
    pub barcode: Option<String>,
    /// Serving amount
    #[serde(default = "default_serving_size")]
    pub serving_size: f64,
    /// Serving unit
    #[serde(default = "default_serving_unit")]
    pub serving_unit: String,
    /// Energy in kcal
    #[serde(default)]
    pub calories: f64,
    /// Protein in grams
    #[serde(default)]
    pub protein_g: f64,
    /// Carbohydrates in grams
    #[serde(default)]
    pub carbs_g: f64,
    /// Fat in grams
    #[serde(default)]
    pub fat_g: f64,
    /// Fiber in grams
    #[serde(default)]
    pub fiber_g: f64,
    /// Sugars in grams
    #[serde(default)]
    pub sugar_g: f64,
    /// Sodium in milligrams
    #[serde(default)]
    pub sodium_mg: f64,
}

const fn default_serving_size() -> f64 {
    100.0
}

fn default_serving_unit() -> String {
    "g".to_owned()
}

impl From<&CustomFood> for FoodRecord {
    fn from(food: &CustomFood) -> Self {
        Self::new(FoodSource::Local, food.id.clone(), food.name.clone())
            .with_brand(food.brand.clone())
            .with_barcode(food.barcode.clone())
            .with_nutrition(NutritionFacts {
                calories_per_serving: food.calories,
                protein_grams: food.protein_g,
                carbs_grams: food.carbs_g,
                fat_grams: food.fat_g,
                fiber_grams: food.fiber_g,
                sugar_grams: food.sugar_g,
                sodium_mg: food.sodium_mg,
            })
            .with_serving(Serving::new(food.serving_size, food.serving_unit.clone()))
    }
}

/// Storage backend for custom foods
#[async_trait]
pub trait CustomFoodStore: Send + Sync {
    /// Foods whose name or brand contains `query`, at most `limit`
    async fn search(&self, query: &str, limit: usize) -> ProviderResult<Vec<CustomFood>>;

    /// Food with exactly this barcode
    async fn find_by_barcode(&self, barcode: &str) -> ProviderResult<Option<CustomFood>>;
}

/// Custom foods held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomFoods {
    foods: Vec<CustomFood>,
}

impl InMemoryCustomFoods {
    /// Wrap an existing list
    #[must_use]
    pub const fn new(foods: Vec<CustomFood>) -> Self {
        Self { foods }
    }

    /// Load foods from a JSON array file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array of custom foods
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("cannot read custom foods {}: {e}", path.display()))
        })?;
        let foods: Vec<CustomFood> = serde_json::from_str(&raw).map_err(|e| {
            AppError::config(format!("invalid custom foods {}: {e}", path.display()))
        })?;
        info!(count = foods.len(), path = %path.display(), "Loaded custom foods");
        Ok(Self::new(foods))
    }

    /// Number of stored foods
    #[must_use]
    pub fn len(&self) -> usize {
        self.foods.len()
    }

    /// Whether the store holds no foods
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}

#[async_trait]
impl CustomFoodStore for InMemoryCustomFoods {
    async fn search(&self, query: &str, limit: usize) -> ProviderResult<Vec<CustomFood>> {
        Ok(self
            .foods
            .iter()
            .filter(|food| {
                contains_ignore_case(&food.name, query)
                    || food
                        .brand
                        .as_deref()
                        .is_some_and(|brand| contains_ignore_case(brand, query))
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_by_barcode(&self, barcode: &str) -> ProviderResult<Option<CustomFood>> {
        Ok(self
            .foods
            .iter()
            .find(|food| food.barcode.as_deref().map(str::trim) == Some(barcode))
            .cloned())
    }
}

/// Source over the user's custom foods; unconfigured when no store is attached
#[derive(Clone, Default)]
pub struct LocalFoodSource {
    store: Option<Arc<dyn CustomFoodStore>>,
}

impl LocalFoodSource {
    /// Source backed by `store`
    #[must_use]
    pub fn new(store: Arc<dyn CustomFoodStore>) -> Self {
        Self { store: Some(store) }
    }

    /// Source with no store, every call reports `NotConfigured`
    #[must_use]
    pub const fn unconfigured() -> Self {
        Self { store: None }
    }

    fn store(&self) -> ProviderResult<&Arc<dyn CustomFoodStore>> {
        self.store.as_ref().ok_or_else(|| ProviderError::NotConfigured {
            provider: PROVIDER.to_owned(),
        })
    }
}

#[async_trait]
impl FoodDataSource for LocalFoodSource {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn source(&self) -> FoodSource {
        FoodSource::Local
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::TEXT_SEARCH | SourceCapabilities::BARCODE_LOOKUP
    }

    fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    #[instrument(skip(self), fields(source = PROVIDER))]
    async fn search(&self, query: &str, limit: usize) -> ProviderResult<Vec<FoodRecord>> {
        let foods = self.store()?.search(query, limit).await?;
        debug!(count = foods.len(), "Custom food search");
        Ok(foods.iter().map(FoodRecord::from).collect())
    }

    #[instrument(skip(self), fields(source = PROVIDER))]
    async fn lookup_barcode(&self, barcode: &str) -> ProviderResult<Option<FoodRecord>> {
        let food = self.store()?.find_by_barcode(barcode).await?;
        Ok(food.as_ref().map(FoodRecord::from))
    }
}
