//! Enrichment pipeline for live carpark availability
//!
//! This module joins the live availability feed with the static facility
//! catalog and produces geolocated, fresh records for map display.
//!
//! # Architecture
//!
//! - [`pipeline`] - Main EnrichmentPipeline struct and run orchestration
//! - [`deduplication`] - First-occurrence-wins deduplication of feed entries
//! - [`validation`] - Typed parsing of raw feed entries
//! - [`enrichment`] - Facility catalog join
//! - [`freshness_filter`] - Staleness filtering of enriched records
//! - [`clock`] - Injectable time sources
//! - [`stats`] - Run statistics and result structures
//!
//! # Processing Pipeline
//!
//! 1. **Fetch**: one request to the feed source; failure aborts the run
//! 2. **Deduplicate**: later entries for a seen carpark number are dropped
//! 3. **Join**: registry address and SVY21 coordinates are merged in
//! 4. **Geocode**: SVY21 coordinates are converted to latitude/longitude
//! 5. **Freshness**: readings older than 24 hours are dropped
//!
//! Geocoding happens after the join and before the freshness filter, so a
//! record's `gps` field depends only on its registry row.

pub mod clock;
pub mod deduplication;
pub mod enrichment;
pub mod freshness_filter;
pub mod pipeline;
pub mod stats;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use clock::{Clock, FixedClock, SystemClock};
pub use freshness_filter::{Freshness, parse_update_datetime};
pub use pipeline::EnrichmentPipeline;
pub use stats::{PipelineResult, PipelineStats};
