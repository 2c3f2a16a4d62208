// ABOUTME: Keyword-driven food classification used as scoring signals
// ABOUTME: Non-food veto, basic staple and processed food heuristics over candidate names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::keywords::KeywordLists;

/// Classifies food names against injected keyword lists
///
/// All checks are case-insensitive substring matches. A name that matches both the basic
/// and processed lists ("apple juice", "chicken nugget") is treated as processed only.
#[derive(Debug, Clone)]
pub struct FoodClassifier {
    non_food: Vec<String>,
    basic: Vec<String>,
    processed: Vec<String>,
}

impl Default for FoodClassifier {
    fn default() -> Self {
        Self::new(KeywordLists::default())
    }
}

impl FoodClassifier {
    /// Build a classifier, lowercasing every term once
    #[must_use]
    pub fn new(lists: KeywordLists) -> Self {
        Self {
            non_food: lowercase_terms(lists.non_food),
            basic: lowercase_terms(lists.basic),
            processed: lowercase_terms(lists.processed),
        }
    }

    /// Whether the name looks like a non-food product
    #[must_use]
    pub fn is_non_food(&self, name: &str) -> bool {
        matches_any(&self.non_food, &name.to_lowercase())
    }

    /// Whether the name looks like an unprocessed staple
    #[must_use]
    pub fn is_basic(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        matches_any(&self.basic, &name) && !matches_any(&self.processed, &name)
    }

    /// Whether the name looks like a processed food
    #[must_use]
    pub fn is_processed(&self, name: &str) -> bool {
        matches_any(&self.processed, &name.to_lowercase())
    }
}

fn lowercase_terms(terms: Vec<String>) -> Vec<String> {
    terms
        .into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn matches_any(terms: &[String], lowercase_name: &str) -> bool {
    terms.iter().any(|term| lowercase_name.contains(term.as_str()))
}
