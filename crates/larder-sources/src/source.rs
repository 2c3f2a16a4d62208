// ABOUTME: Core trait every food data source implements
// ABOUTME: Capability-set interface for text search and barcode lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use bitflags::bitflags;

use crate::errors::provider::ProviderResult;
use crate::models::{FoodRecord, FoodSource};

bitflags! {
    /// Operations a source supports
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SourceCapabilities: u8 {
        /// Free-text search
        const TEXT_SEARCH = 0b0000_0001;
        /// Lookup by GTIN/UPC/EAN barcode
        const BARCODE_LOOKUP = 0b0000_0010;
    }
}

impl SourceCapabilities {
    /// Whether free-text search is supported
    #[must_use]
    pub const fn supports_search(self) -> bool {
        self.contains(Self::TEXT_SEARCH)
    }

    /// Whether barcode lookup is supported
    #[must_use]
    pub const fn supports_barcode(self) -> bool {
        self.contains(Self::BARCODE_LOOKUP)
    }
}

/// A provider of food records
///
/// Implementations map the provider's payload to canonical [`FoodRecord`]s. They report
/// failures as errors and leave recovery (empty batch plus warning) to the caller, so the
/// same adapter can be exercised directly in tests.
#[async_trait]
pub trait FoodDataSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Source tag stamped on every record this adapter produces
    fn source(&self) -> FoodSource;

    /// Operations this source supports
    fn capabilities(&self) -> SourceCapabilities;

    /// Whether credentials are present; unconfigured sources are skipped silently
    fn is_configured(&self) -> bool {
        true
    }

    /// Search by free text, returning at most roughly `limit` records
    async fn search(&self, query: &str, limit: usize) -> ProviderResult<Vec<FoodRecord>>;

    /// Look a product up by barcode
    async fn lookup_barcode(&self, _barcode: &str) -> ProviderResult<Option<FoodRecord>> {
        Ok(None)
    }
}
