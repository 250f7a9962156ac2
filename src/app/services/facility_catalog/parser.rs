//! Facility record parsing from registry CSV rows
//!
//! The registry header is resolved once into a [`ColumnLayout`]; each data row
//! is then mapped into a [`FacilityRecord`] by position.

use crate::app::models::FacilityRecord;
use crate::constants::catalog_columns;
use crate::error::LoadError;
use csv::StringRecord;

/// Column positions resolved from the registry header row
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    pub identifier: usize,
    pub address: usize,
    pub x_coord: usize,
    pub y_coord: usize,
    /// Remaining columns as (position, name)
    pub extra: Vec<(usize, String)>,
}

impl ColumnLayout {
    /// Resolve the layout from a header row
    ///
    /// Header names are trimmed and a leading byte-order mark is ignored.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::MissingColumn` naming the first required column
    /// that is absent.
    pub fn from_headers(headers: &StringRecord, source_name: &str) -> Result<Self, LoadError> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let position = |column: &'static str| {
            names
                .iter()
                .position(|name| name == column)
                .ok_or_else(|| LoadError::MissingColumn {
                    source_name: source_name.to_string(),
                    column,
                })
        };

        let identifier = position(catalog_columns::IDENTIFIER)?;
        let address = position(catalog_columns::ADDRESS)?;
        let x_coord = position(catalog_columns::X_COORD)?;
        let y_coord = position(catalog_columns::Y_COORD)?;

        let extra = names
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty())
            .filter(|(_, name)| !catalog_columns::REQUIRED.contains(&name.as_str()))
            .map(|(i, name)| (i, name.clone()))
            .collect();

        Ok(Self {
            identifier,
            address,
            x_coord,
            y_coord,
            extra,
        })
    }
}

/// Map a data row onto a facility record
///
/// Returns `None` when the row has no carpark number. Coordinates are kept as
/// raw text; missing cells become empty strings.
pub fn parse_facility_row(record: &StringRecord, layout: &ColumnLayout) -> Option<FacilityRecord> {
    let cell = |i: usize| record.get(i).map(str::trim).unwrap_or_default();

    let car_park_no = cell(layout.identifier);
    if car_park_no.is_empty() {
        return None;
    }

    let mut facility = FacilityRecord::new(
        car_park_no,
        cell(layout.address),
        cell(layout.x_coord),
        cell(layout.y_coord),
    );

    for (position, name) in &layout.extra {
        facility
            .details
            .insert(name.clone(), cell(*position).to_string());
    }

    Some(facility)
}
