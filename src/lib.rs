//! Carpark Locator Library
//!
//! Joins the live HDB carpark availability feed with the static carpark
//! registry and produces geolocated, fresh availability records suitable for
//! map display.
//!
//! This library provides tools for:
//! - Loading and indexing the carpark registry for O(1) lookups
//! - Fetching the live availability feed over HTTP (or from a snapshot)
//! - Deduplicating and validating feed entries one by one
//! - Converting SVY21 grid coordinates to WGS84 latitude/longitude
//! - Dropping readings older than a freshness threshold
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use carpark_locator::{EnrichmentPipeline, FacilityCatalog, HttpFeedSource, PipelineConfig};
//!
//! # async fn example() -> carpark_locator::Result<()> {
//! let config = PipelineConfig::default();
//! let catalog = Arc::new(FacilityCatalog::load_or_empty(Path::new("data/HDBCarparkInformation.csv")));
//! let pipeline = EnrichmentPipeline::new(catalog, Arc::new(HttpFeedSource::new(&config)?), config);
//!
//! for record in pipeline.run().await? {
//!     println!("{} {} / {}", record.carpark_number, record.lots_available, record.total_lots);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod coordinate_transformer;
        pub mod enrichment_pipeline;
        pub mod facility_catalog;
        pub mod feed_source;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{EnrichedRecord, FacilityRecord, GeoCoordinate, LiveAvailabilityEntry};
pub use app::services::enrichment_pipeline::{EnrichmentPipeline, PipelineResult, PipelineStats};
pub use app::services::facility_catalog::FacilityCatalog;
pub use app::services::feed_source::{FeedSource, HttpFeedSource, SnapshotFeedSource, StaticFeedSource};
pub use config::PipelineConfig;
pub use error::{Error, FetchError, LoadError, RecordError, Result, TransformError};
