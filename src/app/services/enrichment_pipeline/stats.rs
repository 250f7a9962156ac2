//! Pipeline statistics and result structures
//!
//! Every record excluded from a run is counted under the stage that dropped
//! it, so a smaller-than-expected result set can be explained from the logs.

use crate::app::models::EnrichedRecord;
use chrono::{DateTime, Utc};

/// Statistics for one pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    /// Entries in the first reading group of the raw feed
    pub raw_entries: usize,
    /// Later occurrences of an already-seen carpark number
    pub duplicates_dropped: usize,
    /// Entries rejected as malformed
    pub malformed_dropped: usize,
    /// Entries found in the facility catalog
    pub matched: usize,
    /// Entries absent from the facility catalog
    pub unmatched: usize,
    /// Records that received a GPS position
    pub geocoded: usize,
    /// Records with local coordinates whose transform failed
    pub geocode_failures: usize,
    /// Records older than the freshness threshold
    pub stale_dropped: usize,
    /// Records whose timestamp could not be parsed
    pub unparseable_timestamps: usize,
    /// Records returned to the caller
    pub final_output: usize,
    /// Messages for every malformed entry, for debugging
    pub error_messages: Vec<String>,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a malformed entry
    pub fn add_error(&mut self, message: String) {
        self.malformed_dropped += 1;
        self.error_messages.push(message);
    }

    /// Entries that survived deduplication and validation
    pub fn valid_entries(&self) -> usize {
        self.matched + self.unmatched
    }

    /// Share of unique, valid entries that were matched to the catalog
    pub fn match_rate(&self) -> f64 {
        let valid = self.valid_entries();
        if valid == 0 {
            0.0
        } else {
            (self.matched as f64 / valid as f64) * 100.0
        }
    }

    /// Share of raw entries that reached the output
    pub fn success_rate(&self) -> f64 {
        if self.raw_entries == 0 {
            100.0
        } else {
            (self.final_output as f64 / self.raw_entries as f64) * 100.0
        }
    }

    /// Get summary of pipeline statistics
    pub fn summary(&self) -> String {
        format!(
            "Pipeline Summary: {} -> {} records ({:.1}% returned) | \
             Duplicates: {} | Malformed: {} | Matched: {:.1}% | \
             Geocoded: {} ({} failed) | Stale: {} | Bad timestamps: {}",
            self.raw_entries,
            self.final_output,
            self.success_rate(),
            self.duplicates_dropped,
            self.malformed_dropped,
            self.match_rate(),
            self.geocoded,
            self.geocode_failures,
            self.stale_dropped,
            self.unparseable_timestamps
        )
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Enriched, fresh records in feed order
    pub records: Vec<EnrichedRecord>,
    /// Per-stage counters
    pub stats: PipelineStats,
    /// Instant the freshness filter measured against
    pub evaluated_at: DateTime<Utc>,
}

impl PipelineResult {
    pub fn new(records: Vec<EnrichedRecord>, stats: PipelineStats, evaluated_at: DateTime<Utc>) -> Self {
        Self {
            records,
            stats,
            evaluated_at,
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn summary(&self) -> String {
        self.stats.summary()
    }
}
