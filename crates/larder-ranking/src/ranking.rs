// ABOUTME: Deterministic final ordering and truncation of deduplicated candidates
// ABOUTME: Score, then source priority, then unbranded first, then shorter names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::cmp::Ordering;

use larder_core::models::FoodRecord;

/// Ordering used by [`rank`]
///
/// Name length is counted in Unicode scalar values, not UTF-16 code units or bytes.
#[must_use]
pub fn compare(a: &FoodRecord, b: &FoodRecord) -> Ordering {
    b.score()
        .total_cmp(&a.score())
        .then_with(|| b.source.priority().cmp(&a.source.priority()))
        .then_with(|| a.has_brand().cmp(&b.has_brand()))
        .then_with(|| a.name.chars().count().cmp(&b.name.chars().count()))
}

/// Sort candidates best-first and keep at most `limit`
///
/// The sort is stable, so records equal on every key keep their input order.
#[must_use]
pub fn rank(mut records: Vec<FoodRecord>, limit: usize) -> Vec<FoodRecord> {
    records.sort_by(compare);
    records.truncate(limit);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::models::FoodSource;

    fn scored(source: FoodSource, name: &str, score: f64) -> FoodRecord {
        let mut record = FoodRecord::new(source, name, name);
        record.quality_score = Some(score);
        record
    }

    #[test]
    fn test_tiebreak_chain() {
        let ranked = rank(
            vec![
                scored(FoodSource::OpenFoodFacts, "Rice", 7.0),
                scored(FoodSource::Usda, "Brown Rice", 7.0).with_brand(Some("Uncle".to_owned())),
                scored(FoodSource::Usda, "Long Grain Rice", 7.0),
                scored(FoodSource::Usda, "Rice Cooked", 7.0),
                scored(FoodSource::Local, "Rice Bowl", 6.5),
            ],
            10,
        );
        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Rice Cooked", "Long Grain Rice", "Brown Rice", "Rice", "Rice Bowl"]
        );
    }

    #[test]
    fn test_name_length_counts_characters() {
        let ranked = rank(
            vec![
                scored(FoodSource::Usda, "Creme", 5.0),
                scored(FoodSource::Usda, "Crème", 5.0),
            ],
            10,
        );
        // equal length in characters, so input order is kept
        assert_eq!(ranked[0].name, "Creme");
        assert_eq!(
            compare(&ranked[1], &scored(FoodSource::Usda, "Cremes", 5.0)),
            std::cmp::Ordering::Less
        );
    }

    #[test]
    fn test_truncates_to_limit() {
        let records = (0..20)
            .map(|i| scored(FoodSource::Usda, &format!("Food {i}"), f64::from(i)))
            .collect();
        let ranked = rank(records, 5);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].name, "Food 19");
    }
}
