// ABOUTME: Collapses candidates describing the same product to one highest-scored record
// ABOUTME: Minimum-score filter, exact barcode grouping, then fuzzy name grouping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::debug;

use larder_core::constants::dedup::{MIN_QUALITY_SCORE, NAME_SIMILARITY_THRESHOLD};
use larder_core::models::FoodRecord;

/// Trailing `s` at a word boundary
static PLURAL_SUFFIX: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"s\b").ok());

/// Anything that is not a lowercase letter, digit or whitespace
static NON_ALPHANUMERIC: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").ok());

/// Normalize a name for fuzzy comparison
///
/// Lowercases, drops a trailing `s` from each word, strips punctuation and trims.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let mut normalized = name.to_lowercase();
    if let Some(plural) = PLURAL_SUFFIX.as_ref() {
        normalized = plural.replace_all(&normalized, "").into_owned();
    }
    if let Some(punctuation) = NON_ALPHANUMERIC.as_ref() {
        normalized = punctuation.replace_all(&normalized, "").into_owned();
    }
    normalized.trim().to_owned()
}

fn token_set(normalized: &str) -> HashSet<String> {
    normalized.split_whitespace().map(str::to_owned).collect()
}

fn set_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let larger = a.len().max(b.len());
    if larger == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / larger as f64
}

/// Token-set similarity of two names after normalization, in [0, 1]
#[must_use]
pub fn name_similarity(a: &str, b: &str) -> f64 {
    set_similarity(&token_set(&normalize_name(a)), &token_set(&normalize_name(b)))
}

/// Deduplicate scored candidates
///
/// Records scoring below the minimum are dropped first. Records sharing a barcode keep
/// only the best-scored one (the first on ties), and every name seen in a barcode group
/// is claimed so barcode-less copies of that product are dropped too. The remaining
/// records are grouped by name similarity in input order. Output lists barcode winners
/// first, then fuzzy-group winners.
#[must_use]
pub fn deduplicate(records: Vec<FoodRecord>) -> Vec<FoodRecord> {
    let input = records.len();
    let mut barcode_winners: Vec<FoodRecord> = Vec::new();
    let mut barcode_slots: HashMap<String, usize> = HashMap::new();
    let mut claimed: HashSet<String> = HashSet::new();
    let mut unbarcoded: Vec<FoodRecord> = Vec::new();

    for record in records
        .into_iter()
        .filter(|r| r.score() >= MIN_QUALITY_SCORE)
    {
        let Some(code) = record
            .barcode
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_owned)
        else {
            unbarcoded.push(record);
            continue;
        };

        claimed.insert(normalize_name(&record.name));
        match barcode_slots.get(&code).and_then(|&i| barcode_winners.get_mut(i)) {
            Some(current) => {
                if record.score() > current.score() {
                    *current = record;
                }
            }
            None => {
                barcode_slots.insert(code, barcode_winners.len());
                barcode_winners.push(record);
            }
        }
    }

    let mut accepted: Vec<(FoodRecord, HashSet<String>)> = Vec::new();
    for record in unbarcoded {
        let normalized = normalize_name(&record.name);
        if claimed.contains(&normalized) {
            continue;
        }
        let tokens = token_set(&normalized);
        match accepted
            .iter_mut()
            .find(|(_, existing)| set_similarity(existing, &tokens) >= NAME_SIMILARITY_THRESHOLD)
        {
            Some(slot) => {
                if record.score() > slot.0.score() {
                    *slot = (record, tokens);
                }
            }
            None => accepted.push((record, tokens)),
        }
    }

    barcode_winners.extend(accepted.into_iter().map(|(record, _)| record));
    debug!(input, output = barcode_winners.len(), "Deduplicated candidates");
    barcode_winners
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::models::FoodSource;

    fn scored(id: &str, name: &str, score: f64) -> FoodRecord {
        let mut record = FoodRecord::new(FoodSource::Usda, id, name);
        record.quality_score = Some(score);
        record
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Chicken Breasts"), "chicken breast");
        assert_eq!(normalize_name("  Ben & Jerry's Ice-Cream! "), "ben  jerry icecream");
    }

    #[test]
    fn test_similarity_edges() {
        assert!((name_similarity("Chicken Breast", "Chicken Breasts") - 1.0).abs() < 1e-9);
        assert!((name_similarity("Chicken Breast", "Chicken Thigh") - 0.5).abs() < 1e-9);
        assert!(name_similarity("!!!", "???").abs() < f64::EPSILON);
    }

    #[test]
    fn test_barcode_tie_keeps_first() {
        let a = scored("a", "Oat Milk", 6.0).with_barcode(Some("123".to_owned()));
        let b = scored("b", "Oat Drink", 6.0).with_barcode(Some(" 123 ".to_owned()));
        let out = deduplicate(vec![a, b]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].source_id, "a");
    }

    #[test]
    fn test_claimed_names_drop_unbarcoded_copies() {
        let barcoded = scored("a", "Oat Milk", 5.0).with_barcode(Some("123".to_owned()));
        let loose = scored("b", "Oat Milks", 9.0);
        let out = deduplicate(vec![loose, barcoded]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].source_id, "a");
    }

    #[test]
    fn test_fuzzy_winner_replaces_in_place() {
        let out = deduplicate(vec![
            scored("a", "Banana", 5.0),
            scored("b", "Chicken Breast", 6.0),
            scored("c", "Chicken Breasts", 7.0),
        ]);
        let ids: Vec<&str> = out.iter().map(|r| r.source_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
