// ABOUTME: Open Food Facts adapter for product search and barcode lookup
// ABOUTME: Scales per-100 nutriments to the product serving, converting kJ and salt
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Open Food Facts source
//!
//! The public API needs no credentials, only an identifying User-Agent. Nutriments
//! are reported per 100 g/ml and are scaled to the declared serving here.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::constants::providers::{
    OPEN_FOOD_FACTS_BASE_URL, OPEN_FOOD_FACTS_MAX_PAGE_SIZE, OPEN_FOOD_FACTS_USER_AGENT,
};
use crate::errors::provider::{ProviderError, ProviderResult};
use crate::http_client::shared_client;
use crate::models::{FoodRecord, FoodSource, NutritionFacts, Serving};
use crate::source::{FoodDataSource, SourceCapabilities};
use crate::utils::{
    fetch_json, kilojoules_to_kcal, lenient_number, parse_serving_text, per_serving_factor,
    salt_to_sodium,
};

const PROVIDER: &str = "openFoodFacts";
const SEARCH_FIELDS: &str = "code,product_name,brands,serving_size,serving_quantity,nutriments";

/// Open Food Facts endpoint settings
#[derive(Debug, Clone)]
pub struct OpenFoodFactsConfig {
    /// Base URL of the Open Food Facts instance
    pub base_url: String,
    /// User-Agent sent with every request
    pub user_agent: String,
    /// Set to false to take the source out of rotation
    pub enabled: bool,
}

impl Default for OpenFoodFactsConfig {
    fn default() -> Self {
        Self {
            base_url: OPEN_FOOD_FACTS_BASE_URL.to_owned(),
            user_agent: OPEN_FOOD_FACTS_USER_AGENT.to_owned(),
            enabled: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    #[serde(default)]
    status: Value,
    #[serde(default)]
    product: Option<OffProduct>,
}

/// One Open Food Facts product
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OffProduct {
    /// EAN/UPC code, doubles as the product id
    #[serde(default)]
    pub code: Option<String>,
    /// Product name
    #[serde(default)]
    pub product_name: Option<String>,
    /// Comma-separated brand list
    #[serde(default)]
    pub brands: Option<String>,
    /// Free-text serving, e.g. "1 pouch (49 g)"
    #[serde(default)]
    pub serving_size: Option<String>,
    /// Numeric serving in g/ml (number or numeric string)
    #[serde(default)]
    pub serving_quantity: Option<Value>,
    /// Nutriment map keyed like `energy-kcal_100g`
    #[serde(default)]
    pub nutriments: Map<String, Value>,
}

impl OffProduct {
    fn nutriment(&self, key: &str) -> Option<f64> {
        self.nutriments.get(key).and_then(lenient_number)
    }

    fn name(&self) -> Option<&str> {
        self.product_name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    fn code(&self) -> Option<&str> {
        self.code.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    fn first_brand(&self) -> Option<String> {
        self.brands
            .as_deref()
            .and_then(|brands| brands.split(',').next())
            .map(|brand| brand.trim().to_owned())
    }

    /// Declared serving in g/ml, falling back to the 100 g reference
    fn serving(&self) -> Serving {
        let text_serving = self.serving_size.as_deref().and_then(parse_serving_text);
        if let Some(quantity) = self
            .serving_quantity
            .as_ref()
            .and_then(lenient_number)
            .filter(|q| *q > 0.0)
        {
            let unit = text_serving.map_or_else(|| "g".to_owned(), |s| s.unit);
            return Serving::new(quantity, unit);
        }
        text_serving.unwrap_or_default()
    }

    fn energy_kcal_100(&self) -> f64 {
        self.nutriment("energy-kcal_100g")
            .or_else(|| self.nutriment("energy-kj_100g").map(kilojoules_to_kcal))
            .or_else(|| self.nutriment("energy_100g").map(kilojoules_to_kcal))
            .unwrap_or(0.0)
    }

    fn sodium_mg_100(&self) -> f64 {
        self.nutriment("sodium_100g")
            .or_else(|| self.nutriment("salt_100g").map(salt_to_sodium))
            .map_or(0.0, |grams| grams * 1000.0)
    }
}

/// Map a product to a canonical record, or `None` when it has no name or code
#[must_use]
pub fn transform_product(product: &OffProduct) -> Option<FoodRecord> {
    let name = product.name()?;
    let code = product.code()?;

    let serving = product.serving();
    let factor = per_serving_factor(serving.size);
    let per_100 = |key: &str| product.nutriment(key).unwrap_or(0.0) * factor;

    let nutrition = NutritionFacts {
        calories_per_serving: product.energy_kcal_100() * factor,
        protein_grams: per_100("proteins_100g"),
        carbs_grams: per_100("carbohydrates_100g"),
        fat_grams: per_100("fat_100g"),
        fiber_grams: per_100("fiber_100g"),
        sugar_grams: per_100("sugars_100g"),
        sodium_mg: product.sodium_mg_100() * factor,
    }
    .rounded();

    Some(
        FoodRecord::new(FoodSource::OpenFoodFacts, code, name)
            .with_brand(product.first_brand())
            .with_barcode(Some(code.to_owned()))
            .with_nutrition(nutrition)
            .with_serving(serving),
    )
}

fn product_found(status: &Value) -> bool {
    match status {
        Value::Number(n) => n.as_i64() != Some(0),
        Value::String(s) => s != "0" && s != "failure",
        Value::Bool(b) => *b,
        _ => true,
    }
}

/// Open Food Facts source
pub struct OpenFoodFactsSource {
    config: OpenFoodFactsConfig,
    http_client: Client,
}

impl OpenFoodFactsSource {
    /// Create a source using the shared HTTP client
    #[must_use]
    pub fn new(config: OpenFoodFactsConfig) -> Self {
        Self::with_client(config, shared_client().clone())
    }

    /// Create a source with a caller-supplied HTTP client
    #[must_use]
    pub fn with_client(config: OpenFoodFactsConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn ensure_enabled(&self) -> ProviderResult<()> {
        if self.config.enabled {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured {
                provider: PROVIDER.to_owned(),
            })
        }
    }
}

#[async_trait]
impl FoodDataSource for OpenFoodFactsSource {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn source(&self) -> FoodSource {
        FoodSource::OpenFoodFacts
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::TEXT_SEARCH | SourceCapabilities::BARCODE_LOOKUP
    }

    fn is_configured(&self) -> bool {
        self.config.enabled
    }

    #[instrument(skip(self), fields(source = PROVIDER))]
    async fn search(&self, query: &str, limit: usize) -> ProviderResult<Vec<FoodRecord>> {
        self.ensure_enabled()?;
        let page_size = limit.clamp(1, OPEN_FOOD_FACTS_MAX_PAGE_SIZE).to_string();
        let request = self
            .http_client
            .get(format!("{}/cgi/search.pl", self.config.base_url))
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .query(&[
                ("search_terms", query),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("page_size", page_size.as_str()),
                ("fields", SEARCH_FIELDS),
            ]);

        let response: SearchResponse = fetch_json(PROVIDER, request).await?;
        let total = response.products.len();
        let products: Vec<OffProduct> = response
            .products
            .into_iter()
            .filter_map(|raw| match serde_json::from_value(raw) {
                Ok(product) => Some(product),
                Err(e) => {
                    debug!(error = %e, "Skipping malformed Open Food Facts product");
                    None
                }
            })
            .collect();
        let records: Vec<FoodRecord> = products
            .iter()
            .filter_map(transform_product)
            .take(limit)
            .collect();
        debug!(total, kept = records.len(), "Open Food Facts search returned products");
        Ok(records)
    }

    #[instrument(skip(self), fields(source = PROVIDER))]
    async fn lookup_barcode(&self, barcode: &str) -> ProviderResult<Option<FoodRecord>> {
        self.ensure_enabled()?;
        let request = self
            .http_client
            .get(format!(
                "{}/api/v2/product/{}.json",
                self.config.base_url,
                urlencoding::encode(barcode)
            ))
            .header(reqwest::header::USER_AGENT, &self.config.user_agent);

        match fetch_json::<ProductResponse>(PROVIDER, request).await {
            Ok(response) if product_found(&response.status) => {
                Ok(response.product.as_ref().and_then(transform_product))
            }
            Ok(_) | Err(ProviderError::ApiError { status: 404, .. }) => Ok(None),
            Err(error) => Err(error),
        }
    }
}
