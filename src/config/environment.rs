// ABOUTME: Environment-based configuration for source credentials and search behaviour
// ABOUTME: Parses provider keys, endpoints, timeouts and optional data file paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use larder_core::constants::providers::{
    NUTRITIONIX_BASE_URL, OPEN_FOOD_FACTS_BASE_URL, OPEN_FOOD_FACTS_USER_AGENT, USDA_BASE_URL,
};
use larder_core::constants::search::{DEFAULT_ADAPTER_TIMEOUT_MS, DEFAULT_MAX_RESULTS};
use larder_core::errors::{AppError, AppResult};
use larder_sources::{NutritionixConfig, OpenFoodFactsConfig, UsdaConfig};
use tracing::{debug, info};

/// Search pipeline settings
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Budget for a single source call
    pub adapter_timeout: Duration,
    /// Optional budget for the whole fan-out; partial results are kept when it fires
    pub request_timeout: Option<Duration>,
    /// Hard cap on the caller's result limit
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            adapter_timeout: Duration::from_millis(DEFAULT_ADAPTER_TIMEOUT_MS),
            request_timeout: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl SearchConfig {
    /// Load search settings from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but not a valid number
    pub fn from_env() -> AppResult<Self> {
        let adapter_timeout_ms =
            parse_env("LARDER_ADAPTER_TIMEOUT_MS", DEFAULT_ADAPTER_TIMEOUT_MS)?;
        let request_timeout = optional_env("LARDER_REQUEST_TIMEOUT_MS")
            .map(|raw| parse_value::<u64>("LARDER_REQUEST_TIMEOUT_MS", &raw))
            .transpose()?
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis);
        let max_results = parse_env("LARDER_MAX_RESULTS", DEFAULT_MAX_RESULTS)?;
        if max_results == 0 {
            return Err(AppError::config_invalid("LARDER_MAX_RESULTS", "0"));
        }

        Ok(Self {
            adapter_timeout: Duration::from_millis(adapter_timeout_ms),
            request_timeout,
            max_results,
        })
    }
}

/// Shared HTTP client timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            connect_timeout_secs: 5,
        }
    }
}

impl HttpClientConfig {
    /// Load client timeouts from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout is set but not a valid number
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            timeout_secs: parse_env("HTTP_CLIENT_TIMEOUT_SECS", defaults.timeout_secs)?,
            connect_timeout_secs: parse_env(
                "HTTP_CLIENT_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,
        })
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default)]
pub struct LarderConfig {
    /// USDA `FoodData` Central settings
    pub usda: UsdaConfig,
    /// Nutritionix settings
    pub nutritionix: NutritionixConfig,
    /// Open Food Facts settings
    pub open_food_facts: OpenFoodFactsConfig,
    /// Search pipeline settings
    pub search: SearchConfig,
    /// Shared HTTP client settings
    pub http_client: HttpClientConfig,
    /// JSON file of custom foods backing the local source
    pub custom_foods_path: Option<PathBuf>,
    /// JSON file overriding the classifier keyword lists
    pub keywords_path: Option<PathBuf>,
}

impl LarderConfig {
    /// Load the full configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is set to a value that cannot be parsed
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            usda: UsdaConfig {
                api_key: optional_env("USDA_API_KEY"),
                base_url: env_var_or("USDA_BASE_URL", USDA_BASE_URL),
            },
            nutritionix: NutritionixConfig {
                app_id: optional_env("NUTRITIONIX_APP_ID"),
                app_key: optional_env("NUTRITIONIX_APP_KEY"),
                base_url: env_var_or("NUTRITIONIX_BASE_URL", NUTRITIONIX_BASE_URL),
            },
            open_food_facts: OpenFoodFactsConfig {
                base_url: env_var_or("OPENFOODFACTS_BASE_URL", OPEN_FOOD_FACTS_BASE_URL),
                user_agent: env_var_or("OPENFOODFACTS_USER_AGENT", OPEN_FOOD_FACTS_USER_AGENT),
                enabled: parse_bool_env("OPENFOODFACTS_ENABLED", true)?,
            },
            search: SearchConfig::from_env()?,
            http_client: HttpClientConfig::from_env()?,
            custom_foods_path: optional_env("LARDER_CUSTOM_FOODS_PATH").map(PathBuf::from),
            keywords_path: optional_env("LARDER_KEYWORDS_PATH").map(PathBuf::from),
        };

        config.log_summary();
        Ok(config)
    }

    /// Names of sources that have what they need to run
    #[must_use]
    pub fn configured_sources(&self) -> Vec<&'static str> {
        let mut sources = Vec::new();
        if self.custom_foods_path.is_some() {
            sources.push("local");
        }
        if self.usda.api_key.is_some() {
            sources.push("usda");
        }
        if self.nutritionix.app_id.is_some() && self.nutritionix.app_key.is_some() {
            sources.push("nutritionix");
        }
        if self.open_food_facts.enabled {
            sources.push("openFoodFacts");
        }
        sources
    }

    fn log_summary(&self) {
        info!(
            sources = ?self.configured_sources(),
            adapter_timeout_ms = self.search.adapter_timeout.as_millis(),
            request_timeout_ms = ?self.search.request_timeout.map(|t| t.as_millis()),
            max_results = self.search.max_results,
            "Configuration loaded"
        );
        if self.keywords_path.is_some() {
            debug!(path = ?self.keywords_path, "Keyword lists will be loaded from file");
        }
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Non-blank environment variable, trimmed
fn optional_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> AppResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::config_invalid(key, raw))
}

/// Parse a variable, falling back to `default` when unset or blank
fn parse_env<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_bool_env(key: &str, default: bool) -> AppResult<bool> {
    match optional_env(key).map(|v| v.to_lowercase()).as_deref() {
        None => Ok(default),
        Some("true" | "1" | "yes" | "on") => Ok(true),
        Some("false" | "0" | "no" | "off") => Ok(false),
        Some(other) => Err(AppError::config_invalid(key, other)),
    }
}
