// ABOUTME: Nutritionix v2 adapter for instant search and UPC lookup
// ABOUTME: Maps Nutritionix foods (already per serving) to canonical records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutritionix source
//!
//! Unlike USDA and Open Food Facts, Nutritionix reports nutrients for the declared
//! serving, so no per-100 scaling happens here. Instant search is called with
//! `detailed=true` so that `full_nutrients` is populated for both branded and common
//! foods; the `nf_*` shortcut fields win when present.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::constants::providers::{NUTRITIONIX_BASE_URL, NUTRITIONIX_MAX_RESULTS};
use crate::errors::provider::{ProviderError, ProviderResult};
use crate::http_client::shared_client;
use crate::models::{FoodRecord, FoodSource, NutritionFacts, Serving};
use crate::source::{FoodDataSource, SourceCapabilities};
use crate::utils::fetch_json;
use larder_core::units::to_base;

const PROVIDER: &str = "nutritionix";

// USDA SR attribute ids used by `full_nutrients`
const ATTR_ENERGY_KCAL: u32 = 208;
const ATTR_PROTEIN: u32 = 203;
const ATTR_FAT: u32 = 204;
const ATTR_CARBS: u32 = 205;
const ATTR_FIBER: u32 = 291;
const ATTR_SUGARS: u32 = 269;
const ATTR_SODIUM: u32 = 307;

/// Nutritionix credentials and endpoint
#[derive(Debug, Clone)]
pub struct NutritionixConfig {
    /// `x-app-id` header value
    pub app_id: Option<String>,
    /// `x-app-key` header value
    pub app_key: Option<String>,
    /// Base URL for the v2 API
    pub base_url: String,
}

impl Default for NutritionixConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            app_key: None,
            base_url: NUTRITIONIX_BASE_URL.to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct InstantResponse {
    #[serde(default)]
    branded: Vec<NixFood>,
    #[serde(default)]
    common: Vec<NixFood>,
}

#[derive(Debug, Deserialize)]
struct ItemResponse {
    #[serde(default)]
    foods: Vec<NixFood>,
}

/// `full_nutrients` entry
#[derive(Debug, Clone, Deserialize)]
pub struct NixNutrient {
    /// USDA SR attribute id
    pub attr_id: u32,
    /// Amount for the declared serving
    pub value: f64,
}

/// One Nutritionix food (branded or common)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NixFood {
    /// Display name
    pub food_name: String,
    /// Brand (branded foods only)
    #[serde(default)]
    pub brand_name: Option<String>,
    /// Branded item id
    #[serde(default)]
    pub nix_item_id: Option<String>,
    /// Common food tag id (number or string depending on endpoint)
    #[serde(default)]
    pub tag_id: Option<Value>,
    /// Declared serving quantity
    #[serde(default)]
    pub serving_qty: Option<f64>,
    /// Declared serving unit ("cup", "bar", "g")
    #[serde(default)]
    pub serving_unit: Option<String>,
    /// Serving weight in grams
    #[serde(default)]
    pub serving_weight_grams: Option<f64>,
    /// Calories per serving
    #[serde(default)]
    pub nf_calories: Option<f64>,
    /// Protein per serving (g)
    #[serde(default)]
    pub nf_protein: Option<f64>,
    /// Total carbohydrates per serving (g)
    #[serde(default)]
    pub nf_total_carbohydrate: Option<f64>,
    /// Total fat per serving (g)
    #[serde(default)]
    pub nf_total_fat: Option<f64>,
    /// Fiber per serving (g)
    #[serde(default)]
    pub nf_dietary_fiber: Option<f64>,
    /// Sugars per serving (g)
    #[serde(default)]
    pub nf_sugars: Option<f64>,
    /// Sodium per serving (mg)
    #[serde(default)]
    pub nf_sodium: Option<f64>,
    /// Detailed nutrients per serving
    #[serde(default)]
    pub full_nutrients: Vec<NixNutrient>,
    /// UPC when the endpoint echoes it
    #[serde(default)]
    pub upc: Option<String>,
}

impl NixFood {
    fn attr(&self, attr_id: u32) -> Option<f64> {
        self.full_nutrients
            .iter()
            .find(|n| n.attr_id == attr_id)
            .map(|n| n.value)
    }

    fn native_id(&self) -> String {
        if let Some(id) = self.nix_item_id.as_deref().filter(|id| !id.is_empty()) {
            return id.to_owned();
        }
        match &self.tag_id {
            Some(Value::String(tag)) if !tag.is_empty() => format!("tag{tag}"),
            Some(Value::Number(tag)) => format!("tag{tag}"),
            _ => self.food_name.trim().to_lowercase().replace(' ', "-"),
        }
    }

    /// Serving weight in grams when known, else the declared quantity and unit
    fn serving(&self) -> Serving {
        if let Some(grams) = self.serving_weight_grams.filter(|g| *g > 0.0) {
            return Serving::new(grams, "g");
        }
        match (self.serving_qty, self.serving_unit.as_deref()) {
            (Some(qty), Some(unit)) if qty > 0.0 => {
                let base = to_base(qty, unit);
                base.kind
                    .base_unit()
                    .map_or_else(|| Serving::new(qty, unit), |b| Serving::new(base.value, b))
            }
            _ => Serving::default(),
        }
    }
}

/// Map a Nutritionix food to a canonical record; values are already per serving
#[must_use]
pub fn transform_food(food: &NixFood, barcode: Option<&str>) -> FoodRecord {
    let pick = |shortcut: Option<f64>, attr_id: u32| {
        shortcut.or_else(|| food.attr(attr_id)).unwrap_or(0.0)
    };

    let nutrition = NutritionFacts {
        calories_per_serving: pick(food.nf_calories, ATTR_ENERGY_KCAL),
        protein_grams: pick(food.nf_protein, ATTR_PROTEIN),
        carbs_grams: pick(food.nf_total_carbohydrate, ATTR_CARBS),
        fat_grams: pick(food.nf_total_fat, ATTR_FAT),
        fiber_grams: pick(food.nf_dietary_fiber, ATTR_FIBER),
        sugar_grams: pick(food.nf_sugars, ATTR_SUGARS),
        sodium_mg: pick(food.nf_sodium, ATTR_SODIUM),
    }
    .rounded();

    let barcode = barcode.map(str::to_owned).or_else(|| food.upc.clone());

    FoodRecord::new(FoodSource::Nutritionix, food.native_id(), food.food_name.clone())
        .with_brand(food.brand_name.clone())
        .with_barcode(barcode)
        .with_nutrition(nutrition)
        .with_serving(food.serving())
}

/// Nutritionix source
pub struct NutritionixSource {
    config: NutritionixConfig,
    http_client: Client,
}

impl NutritionixSource {
    /// Create a source using the shared HTTP client
    #[must_use]
    pub fn new(config: NutritionixConfig) -> Self {
        Self::with_client(config, shared_client().clone())
    }

    /// Create a source with a caller-supplied HTTP client
    #[must_use]
    pub fn with_client(config: NutritionixConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn credentials(&self) -> ProviderResult<(&str, &str)> {
        let id = self.config.app_id.as_deref().filter(|v| !v.trim().is_empty());
        let key = self.config.app_key.as_deref().filter(|v| !v.trim().is_empty());
        id.zip(key).ok_or_else(|| ProviderError::NotConfigured {
            provider: PROVIDER.to_owned(),
        })
    }

    fn get(&self, path: &str) -> ProviderResult<RequestBuilder> {
        let (app_id, app_key) = self.credentials()?;
        Ok(self
            .http_client
            .get(format!("{}{path}", self.config.base_url))
            .header("x-app-id", app_id)
            .header("x-app-key", app_key))
    }
}

#[async_trait]
impl FoodDataSource for NutritionixSource {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn source(&self) -> FoodSource {
        FoodSource::Nutritionix
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::TEXT_SEARCH | SourceCapabilities::BARCODE_LOOKUP
    }

    fn is_configured(&self) -> bool {
        self.credentials().is_ok()
    }

    #[instrument(skip(self), fields(source = PROVIDER))]
    async fn search(&self, query: &str, limit: usize) -> ProviderResult<Vec<FoodRecord>> {
        let request = self.get("/search/instant")?.query(&[
            ("query", query),
            ("branded", "true"),
            ("common", "true"),
            ("detailed", "true"),
        ]);
        let response: InstantResponse = fetch_json(PROVIDER, request).await?;
        debug!(
            branded = response.branded.len(),
            common = response.common.len(),
            "Nutritionix instant search returned foods"
        );

        let limit = limit.min(NUTRITIONIX_MAX_RESULTS);
        Ok(response
            .branded
            .iter()
            .chain(response.common.iter())
            .filter(|food| !food.food_name.trim().is_empty())
            .take(limit)
            .map(|food| transform_food(food, None))
            .collect())
    }

    #[instrument(skip(self), fields(source = PROVIDER))]
    async fn lookup_barcode(&self, barcode: &str) -> ProviderResult<Option<FoodRecord>> {
        let request = self.get("/search/item")?.query(&[("upc", barcode)]);
        match fetch_json::<ItemResponse>(PROVIDER, request).await {
            Ok(response) => Ok(response
                .foods
                .first()
                .map(|food| transform_food(food, Some(barcode)))),
            Err(ProviderError::ApiError { status: 404, .. }) => Ok(None),
            Err(error) => Err(error),
        }
    }
}
