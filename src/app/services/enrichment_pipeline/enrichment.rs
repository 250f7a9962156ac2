//! Facility catalog join
//!
//! Each reading is merged with its registry row. Readings for carparks the
//! registry does not know keep flowing with the unknown-address sentinel and
//! no local coordinates.

use crate::app::models::{EnrichedRecord, FacilityRecord, LiveAvailabilityEntry};
use crate::app::services::facility_catalog::FacilityCatalog;
use tracing::{debug, info};

use super::stats::PipelineStats;

/// Join readings with the facility catalog
///
/// # Arguments
///
/// * `entries` - Validated, deduplicated readings
/// * `catalog` - Catalog for facility lookups
/// * `unknown_address` - Address reported when the lookup misses
/// * `stats` - Mutable reference to pipeline statistics
pub fn join_with_catalog(
    entries: Vec<LiveAvailabilityEntry>,
    catalog: &FacilityCatalog,
    unknown_address: &str,
    stats: &mut PipelineStats,
) -> Vec<EnrichedRecord> {
    let mut enriched = Vec::with_capacity(entries.len());

    for entry in entries {
        let facility = catalog.lookup(&entry.carpark_number);
        match facility {
            Some(_) => stats.matched += 1,
            None => {
                debug!("Carpark {} not found in facility catalog", entry.carpark_number);
                stats.unmatched += 1;
            }
        }
        enriched.push(enrich_entry(entry, facility, unknown_address));
    }

    info!(
        "Catalog join complete: {} matched, {} unmatched",
        stats.matched, stats.unmatched
    );

    enriched
}

/// Merge one reading with its (possibly absent) registry row
pub fn enrich_entry(
    entry: LiveAvailabilityEntry,
    facility: Option<&FacilityRecord>,
    unknown_address: &str,
) -> EnrichedRecord {
    let (address, x_coord, y_coord) = match facility {
        Some(f) => (
            f.address.clone(),
            Some(f.x_coord.clone()),
            Some(f.y_coord.clone()),
        ),
        None => (unknown_address.to_string(), None, None),
    };

    EnrichedRecord {
        carpark_number: entry.carpark_number,
        total_lots: entry.total_lots,
        lots_available: entry.lots_available,
        lot_type: entry.lot_type,
        update_datetime: entry.update_datetime,
        address,
        x_coord,
        y_coord,
        gps: None,
        updated_at: None,
    }
}
