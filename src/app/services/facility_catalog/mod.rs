//! Facility catalog service for O(1) carpark registry lookups
//!
//! This module loads the static HDB carpark registry once at start-up and
//! indexes it by carpark number. The catalog is never mutated after load and
//! is shared between pipeline runs behind an `Arc`.

use crate::app::models::FacilityRecord;
use std::collections::HashMap;
use std::time::Instant;

pub mod loader;
pub mod metadata;
pub mod parser;
pub mod query;

#[cfg(test)]
pub mod tests;

// Re-export key types for convenience
pub use metadata::{CatalogMetadata, LoadStats};

/// Read-only carpark registry keyed by carpark number
///
/// Records are held in load order; `index` maps each identifier to its
/// position so lookups stay O(1) while `list_all` preserves file order.
#[derive(Debug, Clone)]
pub struct FacilityCatalog {
    /// Facility records in load order
    pub(crate) records: Vec<FacilityRecord>,

    /// Carpark number -> position in `records`
    pub(crate) index: HashMap<String, usize>,

    /// Name of the source the catalog was loaded from
    pub(crate) source_name: String,

    /// Instant the catalog finished loading
    pub(crate) load_time: Instant,
}

impl FacilityCatalog {
    /// Create an empty catalog; every lookup misses
    pub fn empty(source_name: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            source_name: source_name.into(),
            load_time: Instant::now(),
        }
    }

    /// Build a catalog from records; later duplicates replace earlier ones
    pub fn from_records(
        source_name: impl Into<String>,
        records: impl IntoIterator<Item = FacilityRecord>,
    ) -> Self {
        let mut catalog = Self::empty(source_name);
        for record in records {
            catalog.insert(record);
        }
        catalog
    }

    /// Insert a record, replacing any existing one in place
    ///
    /// Returns true if an existing record was replaced.
    pub(crate) fn insert(&mut self, record: FacilityRecord) -> bool {
        match self.index.get(&record.car_park_no) {
            Some(&position) => {
                self.records[position] = record;
                true
            }
            None => {
                self.index
                    .insert(record.car_park_no.clone(), self.records.len());
                self.records.push(record);
                false
            }
        }
    }

    /// Get a facility by carpark number (O(1) lookup)
    pub fn lookup(&self, car_park_no: &str) -> Option<&FacilityRecord> {
        self.index
            .get(car_park_no)
            .map(|&position| &self.records[position])
    }

    /// Check if a facility exists in the catalog
    pub fn contains(&self, car_park_no: &str) -> bool {
        self.index.contains_key(car_park_no)
    }

    /// All facilities in load order
    pub fn list_all(&self) -> impl Iterator<Item = &FacilityRecord> {
        self.records.iter()
    }

    /// Number of facilities in the catalog
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get catalog metadata
    pub fn metadata(&self) -> CatalogMetadata {
        CatalogMetadata {
            source_name: self.source_name.clone(),
            facility_count: self.records.len(),
            load_time: self.load_time,
        }
    }
}
