// ABOUTME: Core types and constants for the Larder food search workspace
// ABOUTME: Foundation crate with error handling, canonical food models, units and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Larder Core
//!
//! Foundation crate providing shared types for the Larder food search pipeline.
//! Every source adapter produces the canonical [`models::FoodRecord`] defined here,
//! and every downstream stage (scoring, deduplication, ranking) consumes it.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode` and the adapter-facing `ProviderError`
//! - **models**: canonical food record, nutrition facts, serving and source
//! - **units**: mass/volume conversion to and from grams and milliliters
//! - **constants**: scoring weights, thresholds and provider defaults

/// Unified error handling with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Canonical food data models
pub mod models;

/// Mass and volume unit conversion
pub mod units;
