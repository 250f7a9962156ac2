//! Facility catalog loading
//!
//! The registry is read synchronously, once per process. [`FacilityCatalog::load`]
//! reports failures; [`FacilityCatalog::load_or_empty`] is the entry point for
//! hosts that must keep serving when the registry is unavailable.

use super::FacilityCatalog;
use super::metadata::LoadStats;
use super::parser::{ColumnLayout, parse_facility_row};
use crate::error::LoadError;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

impl FacilityCatalog {
    /// Load the catalog from a registry CSV file
    ///
    /// # Arguments
    /// * `path` - Path to the registry CSV (header row required)
    ///
    /// # Returns
    /// * `Result<(FacilityCatalog, LoadStats), LoadError>` - Catalog and loading statistics
    ///
    /// # Errors
    /// * `LoadError::NotFound` if the file does not exist
    /// * `LoadError::Io` if the file cannot be opened
    /// * `LoadError::MissingColumn` if a required column is absent
    /// * `LoadError::Csv` for malformed CSV content
    pub fn load(path: &Path) -> Result<(Self, LoadStats), LoadError> {
        info!("Loading facility catalog from {}", path.display());

        if !path.exists() {
            return Err(LoadError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let source_name = path.display().to_string();
        let file = File::open(path).map_err(|source| LoadError::Io {
            source_name: source_name.clone(),
            source,
        })?;

        Self::from_reader(file, &source_name)
    }

    /// Load the catalog from any reader producing registry CSV
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> Result<(Self, LoadStats), LoadError> {
        let start_time = Instant::now();
        let mut stats = LoadStats::new();
        let mut catalog = Self::empty(source_name);

        let csv_error = |source: csv::Error| LoadError::Csv {
            source_name: source_name.to_string(),
            source,
        };

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = csv_reader.headers().map_err(csv_error)?.clone();
        let layout = ColumnLayout::from_headers(&headers, source_name)?;

        for result in csv_reader.records() {
            let record = result.map_err(csv_error)?;
            stats.rows_read += 1;

            match parse_facility_row(&record, &layout) {
                Some(facility) => {
                    let car_park_no = facility.car_park_no.clone();
                    if catalog.insert(facility) {
                        // Later rows win, keeping the first row's position
                        warn!(
                            "Duplicate facility found: car_park_no = {}, replacing earlier row",
                            car_park_no
                        );
                        stats.duplicates_replaced += 1;
                    }
                }
                None => {
                    let line = record.position().map(|p| p.line()).unwrap_or_default();
                    warn!(
                        "Skipping row at line {} of {}: missing car_park_no",
                        line, source_name
                    );
                    stats.rows_skipped += 1;
                }
            }
        }

        catalog.load_time = Instant::now();
        stats.facilities_loaded = catalog.len();
        stats.load_duration = start_time.elapsed();

        info!("Facility catalog loaded from {}: {}", source_name, stats.summary());

        Ok((catalog, stats))
    }

    /// Load the catalog, degrading to an empty catalog on failure
    ///
    /// The failure is logged as a warning; afterwards every lookup misses and
    /// pipeline output reports the unknown-address sentinel.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok((catalog, _stats)) => catalog,
            Err(e) => {
                warn!(
                    "Facility catalog unavailable, continuing with an empty catalog: {}",
                    e
                );
                debug!("Catalog load error detail: {:?}", e);
                Self::empty(path.display().to_string())
            }
        }
    }
}
