//! Feed entry deduplication
//!
//! The live feed sometimes lists a carpark more than once in the same
//! snapshot. The first occurrence in delivery order wins; later ones are
//! dropped entirely.

use crate::app::models::LiveAvailabilityEntry;
use crate::error::RecordError;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info};

use super::stats::PipelineStats;

/// Keep the first raw entry for each carpark number
///
/// Entries without a readable carpark number cannot be deduplicated and are
/// dropped as malformed.
///
/// # Arguments
///
/// * `raw_entries` - Raw feed entries in delivery order
/// * `stats` - Mutable reference to pipeline statistics
///
/// # Returns
///
/// The surviving entries, still in delivery order
pub fn deduplicate_entries<'a>(raw_entries: &'a [Value], stats: &mut PipelineStats) -> Vec<&'a Value> {
    let mut seen: HashSet<String> = HashSet::with_capacity(raw_entries.len());
    let mut unique = Vec::with_capacity(raw_entries.len());

    for (position, raw) in raw_entries.iter().enumerate() {
        let Some(carpark_number) = LiveAvailabilityEntry::identifier_of(raw) else {
            let error = RecordError::MissingIdentifier;
            debug!("Dropping feed entry at position {}: {}", position, error);
            stats.add_error(format!("entry {}: {}", position, error));
            continue;
        };

        if seen.insert(carpark_number.clone()) {
            unique.push(raw);
        } else {
            debug!(
                "Dropping duplicate feed entry for carpark {} at position {}",
                carpark_number, position
            );
            stats.duplicates_dropped += 1;
        }
    }

    info!(
        "Deduplication complete: {} -> {} entries ({} duplicates dropped)",
        raw_entries.len(),
        unique.len(),
        stats.duplicates_dropped
    );

    unique
}
