// ABOUTME: Canonical food record produced by every source adapter
// ABOUTME: FoodRecord, NutritionFacts, Serving and FoodSource definitions with invariants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::source_priority;
use crate::constants::units::DEFAULT_SERVING_GRAMS;
use crate::units::to_base;

/// Data provider a record came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FoodSource {
    /// User-curated custom foods
    Local,
    /// USDA `FoodData` Central
    Usda,
    /// Nutritionix
    Nutritionix,
    /// Open Food Facts
    OpenFoodFacts,
    /// Any provider this build does not know about
    #[serde(other)]
    Unknown,
}

impl FoodSource {
    /// Stable identifier used in record ids and logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Usda => "usda",
            Self::Nutritionix => "nutritionix",
            Self::OpenFoodFacts => "openFoodFacts",
            Self::Unknown => "unknown",
        }
    }

    /// Trust priority used by scoring and as a ranking tiebreak
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Local => source_priority::LOCAL,
            Self::Usda => source_priority::USDA,
            Self::Nutritionix => source_priority::NUTRITIONIX,
            Self::OpenFoodFacts => source_priority::OPEN_FOOD_FACTS,
            Self::Unknown => source_priority::UNKNOWN,
        }
    }
}

impl fmt::Display for FoodSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nutrition facts for one declared serving
///
/// Every field is per the record's own serving, never per 100 g.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionFacts {
    /// Energy in kcal
    pub calories_per_serving: f64,
    /// Protein in grams
    pub protein_grams: f64,
    /// Carbohydrates in grams
    pub carbs_grams: f64,
    /// Fat in grams
    pub fat_grams: f64,
    /// Dietary fiber in grams
    pub fiber_grams: f64,
    /// Total sugars in grams
    pub sugar_grams: f64,
    /// Sodium in milligrams
    pub sodium_mg: f64,
}

impl NutritionFacts {
    /// Replace negative or non-finite values with zero
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            calories_per_serving: non_negative(self.calories_per_serving),
            protein_grams: non_negative(self.protein_grams),
            carbs_grams: non_negative(self.carbs_grams),
            fat_grams: non_negative(self.fat_grams),
            fiber_grams: non_negative(self.fiber_grams),
            sugar_grams: non_negative(self.sugar_grams),
            sodium_mg: non_negative(self.sodium_mg),
        }
    }

    /// Round to display precision: whole kcal and mg, one decimal for grams
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            calories_per_serving: self.calories_per_serving.round(),
            protein_grams: round_tenth(self.protein_grams),
            carbs_grams: round_tenth(self.carbs_grams),
            fat_grams: round_tenth(self.fat_grams),
            fiber_grams: round_tenth(self.fiber_grams),
            sugar_grams: round_tenth(self.sugar_grams),
            sodium_mg: self.sodium_mg.round(),
        }
    }
}

/// Declared serving of a food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Serving {
    /// Serving amount, always greater than zero
    pub size: f64,
    /// Serving unit label
    pub unit: String,
}

impl Serving {
    /// Build a serving, falling back to 100 g when the size is not a positive number
    pub fn new(size: f64, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        if size.is_finite() && size > 0.0 && !unit.trim().is_empty() {
            Self { size, unit }
        } else {
            Self::default()
        }
    }

    /// Serving in grams (or milliliters for volumes); unknown units pass through
    #[must_use]
    pub fn grams_equivalent(&self) -> f64 {
        to_base(self.size, &self.unit).value
    }
}

impl Default for Serving {
    fn default() -> Self {
        Self {
            size: DEFAULT_SERVING_GRAMS,
            unit: "g".to_owned(),
        }
    }
}

/// Canonical food record, the unit of exchange throughout the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecord {
    /// Source-qualified identifier, `<source>_<source_id>`
    pub id: String,
    /// Display name
    pub name: String,
    /// Brand or manufacturer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// GTIN/UPC/EAN barcode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// Nutrition per serving
    pub nutrition: NutritionFacts,
    /// Declared serving
    pub serving: Serving,
    /// Provider the record came from
    pub source: FoodSource,
    /// Provider-native identifier
    pub source_id: String,
    /// Composite quality score attached by the scorer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
}

impl FoodRecord {
    /// Create a record with zeroed nutrition and the default serving
    pub fn new(source: FoodSource, source_id: impl Into<String>, name: impl Into<String>) -> Self {
        let source_id = source_id.into();
        Self {
            id: Self::record_id(source, &source_id),
            name: name.into().trim().to_owned(),
            brand: None,
            barcode: None,
            nutrition: NutritionFacts::default(),
            serving: Serving::default(),
            source,
            source_id,
            quality_score: None,
        }
    }

    /// Source-qualified id for a `(source, source_id)` pair
    #[must_use]
    pub fn record_id(source: FoodSource, source_id: &str) -> String {
        format!("{source}_{source_id}")
    }

    /// Set the brand; blank values are stored as `None`
    #[must_use]
    pub fn with_brand(mut self, brand: Option<String>) -> Self {
        self.brand = brand.and_then(non_blank);
        self
    }

    /// Set the barcode; blank values are stored as `None`
    #[must_use]
    pub fn with_barcode(mut self, barcode: Option<String>) -> Self {
        self.barcode = barcode.and_then(non_blank);
        self
    }

    /// Set nutrition facts, clamping invalid values to zero
    #[must_use]
    pub fn with_nutrition(mut self, nutrition: NutritionFacts) -> Self {
        self.nutrition = nutrition.sanitized();
        self
    }

    /// Set the declared serving
    #[must_use]
    pub fn with_serving(mut self, serving: Serving) -> Self {
        self.serving = serving;
        self
    }

    /// Whether a non-empty brand is present
    #[must_use]
    pub fn has_brand(&self) -> bool {
        self.brand.as_deref().is_some_and(|b| !b.trim().is_empty())
    }

    /// Whether a non-empty barcode is present
    #[must_use]
    pub fn has_barcode(&self) -> bool {
        self.barcode.as_deref().is_some_and(|b| !b.trim().is_empty())
    }

    /// Attached quality score, zero when the record has not been scored
    #[must_use]
    pub fn score(&self) -> f64 {
        self.quality_score.unwrap_or(0.0)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
