// ABOUTME: USDA FoodData Central adapter for food search and barcode lookup
// ABOUTME: Maps FDC search payloads to canonical records with per-serving nutrition
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! USDA `FoodData` Central source
//!
//! Search results from `/foods/search` carry nutrients per 100 g (or 100 ml). Branded
//! foods also declare a serving (`servingSize` + `servingSizeUnit`); other data types do
//! not, and are reported per 100 g.
//!
//! # API Reference
//! USDA `FoodData` Central API: <https://fdc.nal.usda.gov/api-guide.html>

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::constants::providers::{USDA_BASE_URL, USDA_MAX_PAGE_SIZE};
use crate::errors::provider::{ProviderError, ProviderResult};
use crate::http_client::shared_client;
use crate::models::{FoodRecord, FoodSource, NutritionFacts, Serving};
use crate::source::{FoodDataSource, SourceCapabilities};
use crate::utils::{fetch_json, kilojoules_to_kcal, per_serving_factor};
use larder_core::units::to_base;

const PROVIDER: &str = "usda";

/// USDA API client configuration
#[derive(Debug, Clone)]
pub struct UsdaConfig {
    /// USDA API key (free from <https://fdc.nal.usda.gov/api-key-signup.html>)
    pub api_key: Option<String>,
    /// Base URL for the USDA API
    pub base_url: String,
}

impl Default for UsdaConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: USDA_BASE_URL.to_owned(),
        }
    }
}

/// `/foods/search` response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<UsdaFood>,
}

/// One food from a USDA search
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdaFood {
    /// `FoodData` Central ID
    pub fdc_id: u64,
    /// Food description
    pub description: String,
    /// Data type (e.g. "Branded", "Foundation", "SR Legacy")
    #[serde(default)]
    pub data_type: Option<String>,
    /// Brand owner (branded foods)
    #[serde(default)]
    pub brand_owner: Option<String>,
    /// Brand name (branded foods)
    #[serde(default)]
    pub brand_name: Option<String>,
    /// GTIN/UPC barcode (branded foods)
    #[serde(default)]
    pub gtin_upc: Option<String>,
    /// Declared serving amount
    #[serde(default)]
    pub serving_size: Option<f64>,
    /// Declared serving unit ("g", "GRM", "ml", "MLT")
    #[serde(default)]
    pub serving_size_unit: Option<String>,
    /// Nutrients per 100 g/ml
    #[serde(default)]
    pub food_nutrients: Vec<UsdaNutrient>,
}

/// Nutrient entry as returned by search (`value`) or details (`amount`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdaNutrient {
    /// Nutrient ID (1003 protein, 1008 energy, ...)
    #[serde(default)]
    pub nutrient_id: Option<u32>,
    /// Nutrient name
    #[serde(default)]
    pub nutrient_name: Option<String>,
    /// Unit ("G", "MG", "KCAL", "kJ")
    #[serde(default)]
    pub unit_name: Option<String>,
    /// Amount per 100 g/ml
    #[serde(default, alias = "amount")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nutrient {
    Energy,
    Protein,
    Fat,
    Carbs,
    Fiber,
    Sugar,
    Sodium,
}

impl UsdaNutrient {
    fn kind(&self) -> Option<Nutrient> {
        let by_id = match self.nutrient_id {
            Some(1008 | 2047 | 2048 | 1062) => Some(Nutrient::Energy),
            Some(1003) => Some(Nutrient::Protein),
            Some(1004) => Some(Nutrient::Fat),
            Some(1005) => Some(Nutrient::Carbs),
            Some(1079) => Some(Nutrient::Fiber),
            Some(2000 | 1063) => Some(Nutrient::Sugar),
            Some(1093) => Some(Nutrient::Sodium),
            _ => None,
        };
        by_id.or_else(|| {
            let name = self.nutrient_name.as_deref()?.to_lowercase();
            if name.starts_with("energy") {
                Some(Nutrient::Energy)
            } else if name == "protein" {
                Some(Nutrient::Protein)
            } else if name.starts_with("total lipid") || name == "total fat" {
                Some(Nutrient::Fat)
            } else if name.starts_with("carbohydrate") {
                Some(Nutrient::Carbs)
            } else if name.starts_with("fiber") {
                Some(Nutrient::Fiber)
            } else if name.starts_with("sugars") || name == "total sugars" {
                Some(Nutrient::Sugar)
            } else if name.starts_with("sodium") {
                Some(Nutrient::Sodium)
            } else {
                None
            }
        })
    }

    /// Energy in kcal, converting kilojoule entries
    fn kcal(&self) -> Option<f64> {
        let value = self.value?;
        let is_kj = self
            .unit_name
            .as_deref()
            .is_some_and(|u| u.eq_ignore_ascii_case("kj"));
        Some(if is_kj { kilojoules_to_kcal(value) } else { value })
    }
}

/// Collect per-100 nutrient values; the first entry of each kind wins, except that a
/// kcal energy entry replaces an earlier kJ one
fn per_100_values(nutrients: &[UsdaNutrient]) -> NutritionFacts {
    let mut facts = NutritionFacts::default();
    let mut seen = Vec::with_capacity(7);
    let mut energy_is_kcal = false;

    for nutrient in nutrients {
        let Some(kind) = nutrient.kind() else {
            continue;
        };
        let Some(value) = nutrient.value else {
            continue;
        };
        if kind == Nutrient::Energy {
            let is_kcal = !nutrient
                .unit_name
                .as_deref()
                .is_some_and(|u| u.eq_ignore_ascii_case("kj"));
            if seen.contains(&kind) && (energy_is_kcal || !is_kcal) {
                continue;
            }
            facts.calories_per_serving = nutrient.kcal().unwrap_or(0.0);
            energy_is_kcal = is_kcal;
            seen.push(kind);
            continue;
        }
        if seen.contains(&kind) {
            continue;
        }
        seen.push(kind);
        match kind {
            Nutrient::Protein => facts.protein_grams = value,
            Nutrient::Fat => facts.fat_grams = value,
            Nutrient::Carbs => facts.carbs_grams = value,
            Nutrient::Fiber => facts.fiber_grams = value,
            Nutrient::Sugar => facts.sugar_grams = value,
            Nutrient::Sodium => facts.sodium_mg = value,
            Nutrient::Energy => {}
        }
    }
    facts
}

/// Declared serving in canonical units, or 100 g when absent or unusable
fn declared_serving(food: &UsdaFood) -> Serving {
    let (Some(size), Some(unit)) = (food.serving_size, food.serving_size_unit.as_deref()) else {
        return Serving::default();
    };
    let base = to_base(size, unit);
    match base.kind.base_unit() {
        Some(base_unit) if base.value > 0.0 => Serving::new(base.value, base_unit),
        _ => Serving::default(),
    }
}

/// Map a USDA food to a canonical record with nutrition scaled to its serving
#[must_use]
pub fn transform_food(food: &UsdaFood) -> FoodRecord {
    let serving = declared_serving(food);
    let factor = per_serving_factor(serving.size);
    let per_100 = per_100_values(&food.food_nutrients);

    let nutrition = NutritionFacts {
        calories_per_serving: per_100.calories_per_serving * factor,
        protein_grams: per_100.protein_grams * factor,
        carbs_grams: per_100.carbs_grams * factor,
        fat_grams: per_100.fat_grams * factor,
        fiber_grams: per_100.fiber_grams * factor,
        sugar_grams: per_100.sugar_grams * factor,
        sodium_mg: per_100.sodium_mg * factor,
    }
    .rounded();

    let brand = food
        .brand_name
        .clone()
        .filter(|b| !b.trim().is_empty())
        .or_else(|| food.brand_owner.clone());

    FoodRecord::new(FoodSource::Usda, food.fdc_id.to_string(), food.description.clone())
        .with_brand(brand)
        .with_barcode(food.gtin_upc.clone())
        .with_nutrition(nutrition)
        .with_serving(serving)
}

/// Strip leading zeros so UPC-A and EAN-13 spellings of the same code compare equal
fn barcode_key(code: &str) -> &str {
    let trimmed = code.trim().trim_start_matches('0');
    if trimmed.is_empty() {
        "0"
    } else {
        trimmed
    }
}

/// USDA `FoodData` Central source
pub struct UsdaSource {
    config: UsdaConfig,
    http_client: Client,
}

impl UsdaSource {
    /// Create a source using the shared HTTP client
    #[must_use]
    pub fn new(config: UsdaConfig) -> Self {
        Self::with_client(config, shared_client().clone())
    }

    /// Create a source with a caller-supplied HTTP client
    #[must_use]
    pub fn with_client(config: UsdaConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn api_key(&self) -> ProviderResult<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::NotConfigured {
                provider: PROVIDER.to_owned(),
            })
    }

    async fn search_raw(
        &self,
        query: &str,
        page_size: usize,
        data_type: Option<&str>,
    ) -> ProviderResult<Vec<UsdaFood>> {
        let api_key = self.api_key()?;
        let page_size = page_size.clamp(1, USDA_MAX_PAGE_SIZE).to_string();
        let mut params = vec![
            ("query", query),
            ("pageSize", page_size.as_str()),
            ("api_key", api_key),
        ];
        if let Some(data_type) = data_type {
            params.push(("dataType", data_type));
        }

        let url = format!("{}/foods/search", self.config.base_url);
        let response: SearchResponse =
            fetch_json(PROVIDER, self.http_client.get(&url).query(&params)).await?;
        Ok(response.foods)
    }
}

#[async_trait]
impl FoodDataSource for UsdaSource {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn source(&self) -> FoodSource {
        FoodSource::Usda
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::TEXT_SEARCH | SourceCapabilities::BARCODE_LOOKUP
    }

    fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }

    #[instrument(skip(self), fields(source = PROVIDER))]
    async fn search(&self, query: &str, limit: usize) -> ProviderResult<Vec<FoodRecord>> {
        let foods = self.search_raw(query, limit, None).await?;
        debug!(count = foods.len(), "USDA search returned foods");
        Ok(foods.iter().take(limit).map(transform_food).collect())
    }

    #[instrument(skip(self), fields(source = PROVIDER))]
    async fn lookup_barcode(&self, barcode: &str) -> ProviderResult<Option<FoodRecord>> {
        let foods = self.search_raw(barcode, 5, Some("Branded")).await?;
        let wanted = barcode_key(barcode);
        Ok(foods
            .iter()
            .find(|food| {
                food.gtin_upc
                    .as_deref()
                    .is_some_and(|code| barcode_key(code) == wanted)
            })
            .map(transform_food))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nutrient(id: u32, name: &str, unit: &str, value: f64) -> UsdaNutrient {
        UsdaNutrient {
            nutrient_id: Some(id),
            nutrient_name: Some(name.to_owned()),
            unit_name: Some(unit.to_owned()),
            value: Some(value),
        }
    }

    fn food(serving: Option<(f64, &str)>, nutrients: Vec<UsdaNutrient>) -> UsdaFood {
        UsdaFood {
            fdc_id: 42,
            description: "Granola".to_owned(),
            data_type: Some("Branded".to_owned()),
            brand_owner: Some("Oat Co".to_owned()),
            brand_name: None,
            gtin_upc: Some("012345678905".to_owned()),
            serving_size: serving.map(|s| s.0),
            serving_size_unit: serving.map(|s| s.1.to_owned()),
            food_nutrients: nutrients,
        }
    }

    #[test]
    fn test_scales_per_100_to_serving() {
        let record = transform_food(&food(
            Some((50.0, "g")),
            vec![
                nutrient(1008, "Energy", "KCAL", 200.0),
                nutrient(1003, "Protein", "G", 10.0),
                nutrient(1093, "Sodium, Na", "MG", 300.0),
            ],
        ));
        assert!((record.nutrition.calories_per_serving - 100.0).abs() < f64::EPSILON);
        assert!((record.nutrition.protein_grams - 5.0).abs() < f64::EPSILON);
        assert!((record.nutrition.sodium_mg - 150.0).abs() < f64::EPSILON);
        assert!((record.serving.size - 50.0).abs() < f64::EPSILON);
        assert_eq!(record.serving.unit, "g");
    }

    #[test]
    fn test_missing_serving_defaults_to_100_grams() {
        let record = transform_food(&food(None, vec![nutrient(1008, "Energy", "KCAL", 52.0)]));
        assert!((record.nutrition.calories_per_serving - 52.0).abs() < f64::EPSILON);
        assert!((record.serving.size - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kilojoules_are_converted_and_kcal_preferred() {
        let only_kj = transform_food(&food(None, vec![nutrient(1062, "Energy", "kJ", 418.4)]));
        assert!((only_kj.nutrition.calories_per_serving - 100.0).abs() < f64::EPSILON);

        let both = transform_food(&food(
            None,
            vec![
                nutrient(1062, "Energy", "kJ", 1000.0),
                nutrient(1008, "Energy", "KCAL", 250.0),
            ],
        ));
        assert!((both.nutrition.calories_per_serving - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_usda_unit_codes_are_understood() {
        let record = transform_food(&food(Some((240.0, "MLT")), vec![]));
        assert_eq!(record.serving.unit, "ml");
        assert!((record.serving.size - 240.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_brand_owner_fallback_and_barcode() {
        let record = transform_food(&food(None, vec![]));
        assert_eq!(record.brand.as_deref(), Some("Oat Co"));
        assert_eq!(record.barcode.as_deref(), Some("012345678905"));
        assert_eq!(record.id, "usda_42");
    }

    #[test]
    fn test_barcode_key_ignores_leading_zeros() {
        assert_eq!(barcode_key("0012345678905"), barcode_key("12345678905"));
    }

    #[test]
    fn test_unconfigured_without_key() {
        let source = UsdaSource::with_client(UsdaConfig::default(), Client::new());
        assert!(!source.is_configured());
    }
}
