// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Unit factors, scoring weights, deduplication thresholds and provider defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single flat list.

/// Unit conversion factors to canonical base units
pub mod units {
    /// Grams per gram
    pub const GRAMS_PER_GRAM: f64 = 1.0;
    /// Grams per kilogram
    pub const GRAMS_PER_KILOGRAM: f64 = 1000.0;
    /// Grams per avoirdupois ounce
    pub const GRAMS_PER_OUNCE: f64 = 28.349_523_1;
    /// Grams per avoirdupois pound
    pub const GRAMS_PER_POUND: f64 = 453.592_37;

    /// Milliliters per milliliter
    pub const ML_PER_MILLILITER: f64 = 1.0;
    /// Milliliters per liter
    pub const ML_PER_LITER: f64 = 1000.0;
    /// Milliliters per US teaspoon
    pub const ML_PER_TEASPOON: f64 = 4.928_921_6;
    /// Milliliters per US tablespoon
    pub const ML_PER_TABLESPOON: f64 = 14.786_764_8;
    /// Milliliters per US cup
    pub const ML_PER_CUP: f64 = 236.588_236_5;
    /// Milliliters per US fluid ounce
    pub const ML_PER_FLUID_OUNCE: f64 = 29.573_529_6;

    /// Kilojoules per kilocalorie
    pub const KJ_PER_KCAL: f64 = 4.184;
    /// Grams of salt carrying one gram of sodium
    pub const SALT_PER_SODIUM: f64 = 2.5;
    /// Reference amount providers report nutrients against
    pub const PER_100_REFERENCE: f64 = 100.0;
    /// Serving assumed when a provider declares none
    pub const DEFAULT_SERVING_GRAMS: f64 = 100.0;
}

/// Source trust priorities shared by the scorer and the ranker
pub mod source_priority {
    /// User-curated custom foods
    pub const LOCAL: u8 = 5;
    /// USDA `FoodData` Central
    pub const USDA: u8 = 4;
    /// Nutritionix
    pub const NUTRITIONIX: u8 = 4;
    /// Open Food Facts (crowd-sourced)
    pub const OPEN_FOOD_FACTS: u8 = 2;
    /// Any source not listed above
    pub const UNKNOWN: u8 = 0;
    /// Highest priority in the table, used for normalization
    pub const MAX: u8 = LOCAL;
}

/// Quality score weights and bounds
pub mod scoring {
    /// Weight of data completeness
    pub const COMPLETENESS_WEIGHT: f64 = 3.0;
    /// Weight of source reliability
    pub const SOURCE_WEIGHT: f64 = 2.0;
    /// Weight of query relevance
    pub const RELEVANCE_WEIGHT: f64 = 3.0;
    /// Weight of a plausible serving size
    pub const SERVING_WEIGHT: f64 = 1.0;
    /// Weight of brand or barcode presence
    pub const METADATA_WEIGHT: f64 = 1.0;

    /// Score assigned to anything classified as non-food
    pub const NON_FOOD_SCORE: f64 = 0.1;
    /// Upper bound of the composite score
    pub const MAX_SCORE: f64 = 10.0;

    /// Relevance for an exact name match
    pub const EXACT_MATCH: f64 = 1.0;
    /// Relevance for an exact match on an unbranded staple food
    pub const EXACT_BASIC_MATCH: f64 = 1.2;
    /// Relevance when the name starts with the query followed by a space
    pub const PREFIX_MATCH: f64 = 0.9;
    /// Relevance when the name contains the query
    pub const NAME_CONTAINS: f64 = 0.7;
    /// Relevance when the brand contains the query
    pub const BRAND_CONTAINS: f64 = 0.5;
    /// Weight of query words found in the name
    pub const NAME_WORD_OVERLAP: f64 = 0.6;
    /// Weight of query words found in the brand
    pub const BRAND_WORD_OVERLAP: f64 = 0.4;
    /// Bonus for an unbranded staple food
    pub const BASIC_UNBRANDED_BONUS: f64 = 0.4;
    /// Bonus for a branded staple food
    pub const BASIC_BRANDED_BONUS: f64 = 0.2;
    /// Penalty for processed food when the query names a staple
    pub const PROCESSED_PENALTY: f64 = 0.3;

    /// Smallest serving considered plausible, in grams or milliliters
    pub const MIN_REASONABLE_SERVING: f64 = 10.0;
    /// Largest serving considered plausible, in grams or milliliters
    pub const MAX_REASONABLE_SERVING: f64 = 1000.0;
}

/// Deduplication thresholds
pub mod dedup {
    /// Candidates scoring below this never reach deduplication
    pub const MIN_QUALITY_SCORE: f64 = 0.3;
    /// Token-set similarity at which two names describe the same product
    pub const NAME_SIMILARITY_THRESHOLD: f64 = 0.8;
}

/// Search pipeline defaults
pub mod search {
    /// Per-adapter call timeout in milliseconds
    pub const DEFAULT_ADAPTER_TIMEOUT_MS: u64 = 10_000;
    /// Hard cap applied to the caller's result limit
    pub const DEFAULT_MAX_RESULTS: usize = 50;
    /// Result limit used when the caller does not pass one
    pub const DEFAULT_LIMIT: usize = 10;
}

/// Provider endpoints and request limits
pub mod providers {
    /// USDA `FoodData` Central base URL
    pub const USDA_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";
    /// Nutritionix v2 base URL
    pub const NUTRITIONIX_BASE_URL: &str = "https://trackapi.nutritionix.com/v2";
    /// Open Food Facts base URL
    pub const OPEN_FOOD_FACTS_BASE_URL: &str = "https://world.openfoodfacts.org";
    /// User agent Open Food Facts asks API consumers to send
    pub const OPEN_FOOD_FACTS_USER_AGENT: &str = "larder/0.1 (food search aggregation)";
    /// Largest page USDA accepts
    pub const USDA_MAX_PAGE_SIZE: usize = 200;
    /// Largest page Open Food Facts accepts
    pub const OPEN_FOOD_FACTS_MAX_PAGE_SIZE: usize = 100;
    /// Largest branded result count Nutritionix returns
    pub const NUTRITIONIX_MAX_RESULTS: usize = 50;
}
