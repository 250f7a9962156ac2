//! Facility catalog metadata and statistics tracking

use std::time::{Duration, Instant};

/// Statistics about the catalog loading process
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadStats {
    /// Data rows read from the source
    pub rows_read: usize,

    /// Distinct facilities held after loading
    pub facilities_loaded: usize,

    /// Rows that replaced an earlier row with the same carpark number
    pub duplicates_replaced: usize,

    /// Rows skipped because they had no carpark number
    pub rows_skipped: usize,

    /// Time taken to load the catalog
    pub load_duration: Duration,
}

impl LoadStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentage of rows that ended up as distinct facilities
    pub fn retention_rate(&self) -> f64 {
        if self.rows_read == 0 {
            0.0
        } else {
            (self.facilities_loaded as f64 / self.rows_read as f64) * 100.0
        }
    }

    /// Get a summary string of the loading process
    pub fn summary(&self) -> String {
        format!(
            "Read {} rows, loaded {} facilities ({} duplicates replaced, {} skipped) in {:.3}s",
            self.rows_read,
            self.facilities_loaded,
            self.duplicates_replaced,
            self.rows_skipped,
            self.load_duration.as_secs_f64()
        )
    }
}

/// Descriptive information about a loaded catalog
#[derive(Debug, Clone)]
pub struct CatalogMetadata {
    /// Name of the source (usually a file path)
    pub source_name: String,

    /// Number of facilities held
    pub facility_count: usize,

    /// Instant the catalog finished loading
    pub load_time: Instant,
}

impl CatalogMetadata {
    /// Time since the catalog was loaded
    pub fn age(&self) -> Duration {
        self.load_time.elapsed()
    }
}
