//! Feed entry validation
//!
//! Turns deduplicated raw entries into typed readings. A malformed entry is
//! excluded and logged; it never aborts the run.

use crate::app::models::LiveAvailabilityEntry;
use serde_json::Value;
use tracing::{debug, info};

use super::stats::PipelineStats;

/// Validate raw entries, keeping those that parse
pub fn validate_entries(raw_entries: Vec<&Value>, stats: &mut PipelineStats) -> Vec<LiveAvailabilityEntry> {
    let input = raw_entries.len();
    let mut valid = Vec::with_capacity(input);

    for raw in raw_entries {
        match LiveAvailabilityEntry::from_feed_value(raw) {
            Ok(entry) => valid.push(entry),
            Err(e) => {
                debug!("Dropping malformed feed entry: {}", e);
                stats.add_error(e.to_string());
            }
        }
    }

    info!(
        "Validation complete: {} -> {} entries ({} malformed)",
        input,
        valid.len(),
        input - valid.len()
    );

    valid
}
