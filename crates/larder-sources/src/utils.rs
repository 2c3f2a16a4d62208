// ABOUTME: Shared helpers for source adapters
// ABOUTME: Serving-text parsing, energy and salt conversion, per-serving scaling, lenient JSON numbers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use regex::Regex;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::LazyLock;

use crate::constants::units::{KJ_PER_KCAL, PER_100_REFERENCE, SALT_PER_SODIUM};
use crate::errors::provider::{ProviderError, ProviderResult};
use crate::models::Serving;
use larder_core::units::{to_base, UnitKind};

/// Number followed by a unit word, e.g. "49 g", "1,5 l", "8 fl oz"
static QUANTITY_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(fl\.?\s*oz|[a-z]+)").ok()
});

/// Parse a provider's free-text serving description into a canonical serving
///
/// Handles strings such as `"1 pouch (49 g) (49 g)"`, `"250ml"`, `"2 tbsp (30 g)"` or
/// `"1 cup"`. Mass quantities win over volume quantities; within a kind the first one
/// wins. Returns `None` when no recognizable mass or volume is present.
#[must_use]
pub fn parse_serving_text(text: &str) -> Option<Serving> {
    let pattern = QUANTITY_PATTERN.as_ref()?;

    let mut first_volume: Option<f64> = None;
    for captures in pattern.captures_iter(text) {
        let Some(amount) = captures
            .get(1)
            .and_then(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
        else {
            continue;
        };
        let unit = captures.get(2).map_or("", |m| m.as_str());
        let base = to_base(amount, unit);
        match base.kind {
            UnitKind::Mass if base.value > 0.0 => return Some(Serving::new(base.value, "g")),
            UnitKind::Volume if base.value > 0.0 && first_volume.is_none() => {
                first_volume = Some(base.value);
            }
            _ => {}
        }
    }

    first_volume.map(|ml| Serving::new(ml, "ml"))
}

/// Convert kilojoules to kilocalories
#[must_use]
pub fn kilojoules_to_kcal(kilojoules: f64) -> f64 {
    kilojoules / KJ_PER_KCAL
}

/// Sodium in grams carried by the given grams of salt
#[must_use]
pub fn salt_to_sodium(salt_grams: f64) -> f64 {
    salt_grams / SALT_PER_SODIUM
}

/// Multiplier turning a per-100 value into a per-serving value
#[must_use]
pub fn per_serving_factor(serving_base_units: f64) -> f64 {
    serving_base_units / PER_100_REFERENCE
}

/// Read a JSON value that may be a number or a numeric string ("12,5" included)
#[must_use]
pub fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Send a request and decode a JSON body, mapping failures to `ProviderError`
///
/// # Errors
///
/// Returns a network/timeout error when no response arrives, an API error for
/// non-success statuses, and a parse error when the body does not match `T`.
pub async fn fetch_json<T: DeserializeOwned>(
    provider: &str,
    request: RequestBuilder,
) -> ProviderResult<T> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::from_reqwest(provider, &e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::from_status(provider, status.as_u16(), body));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ProviderError::from_reqwest(provider, &e))?;
    serde_json::from_slice(&bytes).map_err(|e| ProviderError::parse(provider, e.to_string()))
}

/// Case-insensitive containment helper shared by in-memory sources
#[must_use]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_parenthesized_grams() {
        let serving = parse_serving_text("1 pouch (49 g) (49 g)").unwrap();
        assert!((serving.size - 49.0).abs() < 1e-9);
        assert_eq!(serving.unit, "g");
    }

    #[test]
    fn test_parses_glued_volume() {
        let serving = parse_serving_text("250ml").unwrap();
        assert!((serving.size - 250.0).abs() < 1e-9);
        assert_eq!(serving.unit, "ml");
    }

    #[test]
    fn test_mass_beats_volume() {
        let serving = parse_serving_text("2 tbsp (32 g)").unwrap();
        assert!((serving.size - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_comma_decimal_and_fluid_ounces() {
        let liters = parse_serving_text("1,5 l").unwrap();
        assert!((liters.size - 1500.0).abs() < 1e-9);
        let fluid = parse_serving_text("8 fl oz").unwrap();
        assert!((fluid.size - 236.588_236_8).abs() < 1e-6);
    }

    #[test]
    fn test_unparseable_serving() {
        assert!(parse_serving_text("1 medium apple").is_none());
        assert!(parse_serving_text("").is_none());
    }

    #[test]
    fn test_lenient_number() {
        assert_eq!(lenient_number(&json!(12.5)), Some(12.5));
        assert_eq!(lenient_number(&json!("12,5")), Some(12.5));
        assert_eq!(lenient_number(&json!("n/a")), None);
        assert_eq!(lenient_number(&json!(null)), None);
    }

    #[test]
    fn test_energy_and_salt_conversion() {
        assert!((kilojoules_to_kcal(418.4) - 100.0).abs() < 1e-9);
        assert!((salt_to_sodium(2.5) - 1.0).abs() < 1e-9);
        assert!((per_serving_factor(50.0) - 0.5).abs() < 1e-9);
    }
}
