// ABOUTME: Core data models shared by every stage of the food search pipeline
// ABOUTME: Re-exports the canonical food record and its component types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Canonical food record, nutrition facts, serving and source
pub mod food;

pub use food::{FoodRecord, FoodSource, NutritionFacts, Serving};
