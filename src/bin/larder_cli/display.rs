// ABOUTME: Output formatting helpers for larder-cli
// ABOUTME: Renders ranked food records as a fixed-width table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use larder::models::FoodRecord;

const NAME_WIDTH: usize = 36;
const BRAND_WIDTH: usize = 18;

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_owned();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
    clipped.push('~');
    clipped
}

/// Print ranked records one per row
pub fn print_table(records: &[FoodRecord]) {
    if records.is_empty() {
        println!("No foods found");
        return;
    }

    println!(
        "{:>5}  {:<NAME_WIDTH$}  {:<BRAND_WIDTH$}  {:<13}  {:>10}  {:>7}  {:>6}  {:>6}  {:>6}",
        "score", "name", "brand", "source", "serving", "kcal", "prot", "carb", "fat"
    );
    println!("{}", "-".repeat(NAME_WIDTH + BRAND_WIDTH + 70));
    for record in records {
        let serving = format!("{}{}", record.serving.size, record.serving.unit);
        println!(
            "{:>5.1}  {:<NAME_WIDTH$}  {:<BRAND_WIDTH$}  {:<13}  {:>10}  {:>7.0}  {:>6.1}  {:>6.1}  {:>6.1}",
            record.score(),
            clip(&record.name, NAME_WIDTH),
            clip(record.brand.as_deref().unwrap_or("-"), BRAND_WIDTH),
            record.source.as_str(),
            clip(&serving, 10),
            record.nutrition.calories_per_serving,
            record.nutrition.protein_grams,
            record.nutrition.carbs_grams,
            record.nutrition.fat_grams,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::clip;

    #[test]
    fn test_clip_marks_truncation() {
        assert_eq!(clip("Apple", 10), "Apple");
        assert_eq!(clip("Strawberry Yogurt", 6), "Straw~");
    }
}
