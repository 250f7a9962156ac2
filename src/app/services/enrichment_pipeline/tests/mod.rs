//! Tests for the enrichment pipeline module
//!
//! Fixtures pin "now" to 2024-03-01 20:00 at UTC+8 so freshness decisions are
//! deterministic.

pub mod freshness_filter_tests;
pub mod pipeline_tests;

use crate::app::models::{FacilityRecord, FeedDocument, ReadingGroup};
use crate::app::services::facility_catalog::FacilityCatalog;
use crate::app::services::feed_source::StaticFeedSource;
use crate::app::services::enrichment_pipeline::{EnrichmentPipeline, FixedClock};
use crate::config::PipelineConfig;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};
use std::sync::Arc;

/// Evaluation instant used across the pipeline tests
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// Zone-less feed timestamp about ten minutes before `test_now`
pub const RECENT: &str = "2024-03-01T19:50:00";

/// Zone-less feed timestamp three days before `test_now`
pub const THREE_DAYS_AGO: &str = "2024-02-27T20:00:00";

/// Build one raw feed entry the way the live feed delivers it
pub fn feed_entry(carpark_number: &str, total: u32, available: i64, updated: &str) -> Value {
    json!({
        "carpark_info": [{
            "total_lots": total.to_string(),
            "lot_type": "C",
            "lots_available": available.to_string()
        }],
        "carpark_number": carpark_number,
        "update_datetime": updated
    })
}

/// Wrap raw entries in a single-group feed document
pub fn feed_document(entries: Vec<Value>) -> FeedDocument {
    FeedDocument {
        items: vec![ReadingGroup {
            timestamp: Some("2024-03-01T20:00:00+08:00".to_string()),
            carpark_data: entries,
        }],
    }
}

/// Catalog with one well-formed facility "A" and one with a broken easting
pub fn create_test_catalog() -> Arc<FacilityCatalog> {
    Arc::new(FacilityCatalog::from_records(
        "test catalog",
        vec![
            FacilityRecord::new("A", "1 Main St", "28000", "38700")
                .with_detail("car_park_type", "SURFACE CAR PARK"),
            FacilityRecord::new("BAD", "2 Side Rd", "not-a-number", "38700"),
            FacilityRecord::new("ACB", "BLK 270/271 ALBERT CENTRE BASEMENT CAR PARK", "30314.7936", "31490.4942"),
        ],
    ))
}

/// Pipeline over a static document with the clock pinned to `test_now`
pub fn create_test_pipeline(entries: Vec<Value>) -> EnrichmentPipeline {
    EnrichmentPipeline::new(
        create_test_catalog(),
        Arc::new(StaticFeedSource::new(feed_document(entries))),
        PipelineConfig::default(),
    )
    .with_clock(Arc::new(FixedClock(test_now())))
}
