// ABOUTME: Configuration module for the food search service
// ABOUTME: Environment-driven settings for sources, timeouts, limits and data files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration
//!
//! Everything is read from the environment. Missing provider credentials are not an
//! error; they leave that source unconfigured and it is skipped at search time.

/// Environment variable loading
pub mod environment;

pub use environment::{HttpClientConfig, LarderConfig, SearchConfig};
