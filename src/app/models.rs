//! Data models for carpark availability processing
//!
//! This module contains the static facility records, the live feed wire
//! format, and the enriched records produced by the pipeline.

use crate::app::services::coordinate_transformer::parse_local_pair;
use crate::error::{RecordError, TransformError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// =============================================================================
// Geographic Coordinates
// =============================================================================

/// WGS84 latitude/longitude in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check the pair lies within valid latitude/longitude ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

// =============================================================================
// Static Facility Catalog
// =============================================================================

/// One row of the static carpark registry
///
/// Local coordinates are kept as the registry's raw text; use
/// [`FacilityRecord::local_position`] for the numeric view. Columns beyond the
/// required four are carried verbatim in `details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    /// Facility identifier, e.g. "ACB"
    pub car_park_no: String,

    /// Street address of the facility
    pub address: String,

    /// SVY21 easting as published in the registry
    pub x_coord: String,

    /// SVY21 northing as published in the registry
    pub y_coord: String,

    /// Remaining registry columns (car_park_type, free_parking, ...)
    #[serde(flatten)]
    pub details: BTreeMap<String, String>,
}

impl FacilityRecord {
    pub fn new(
        car_park_no: impl Into<String>,
        address: impl Into<String>,
        x_coord: impl Into<String>,
        y_coord: impl Into<String>,
    ) -> Self {
        Self {
            car_park_no: car_park_no.into(),
            address: address.into(),
            x_coord: x_coord.into(),
            y_coord: y_coord.into(),
            details: BTreeMap::new(),
        }
    }

    /// Add an extra registry column
    pub fn with_detail(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(column.into(), value.into());
        self
    }

    /// Numeric (x, y) position in SVY21 metres
    pub fn local_position(&self) -> Result<(f64, f64), TransformError> {
        parse_local_pair(Some(&self.x_coord), Some(&self.y_coord))
    }
}

// =============================================================================
// Live Feed Wire Format
// =============================================================================

/// Top-level document returned by the availability endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedDocument {
    pub items: Vec<ReadingGroup>,
}

impl FeedDocument {
    /// The reading group the pipeline consumes
    pub fn first_group(&self) -> Option<&ReadingGroup> {
        self.items.first()
    }
}

/// One snapshot of readings
///
/// Entries stay as raw JSON until the pipeline validates them one by one, so a
/// single malformed entry cannot reject the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(default)]
    pub carpark_data: Vec<Value>,
}

/// A validated live availability reading for one facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveAvailabilityEntry {
    pub carpark_number: String,
    pub total_lots: u32,
    /// Not clamped against `total_lots`; the feed occasionally reports more
    pub lots_available: i64,
    pub lot_type: String,
    /// Feed-supplied ISO-8601 text, parsed by the freshness stage
    pub update_datetime: String,
}

impl LiveAvailabilityEntry {
    /// Read the facility identifier of a raw feed entry
    pub fn identifier_of(raw: &Value) -> Option<String> {
        match raw.get("carpark_number")? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Validate a raw feed entry
    ///
    /// Only the first element of `carpark_info` is used.
    pub fn from_feed_value(raw: &Value) -> Result<Self, RecordError> {
        let carpark_number = Self::identifier_of(raw).ok_or(RecordError::MissingIdentifier)?;

        let update_datetime = raw
            .get("update_datetime")
            .and_then(Value::as_str)
            .ok_or_else(|| RecordError::MissingField {
                carpark_number: carpark_number.clone(),
                field: "update_datetime",
            })?
            .to_string();

        let info = raw
            .get("carpark_info")
            .and_then(Value::as_array)
            .and_then(|infos| infos.first())
            .ok_or_else(|| RecordError::MissingField {
                carpark_number: carpark_number.clone(),
                field: "carpark_info",
            })?;

        let total_lots = integer_field(info, "total_lots", &carpark_number)?;
        let total_lots = u32::try_from(total_lots).map_err(|_| RecordError::InvalidField {
            carpark_number: carpark_number.clone(),
            field: "total_lots",
            value: total_lots.to_string(),
        })?;
        let lots_available = integer_field(info, "lots_available", &carpark_number)?;

        let lot_type = match info.get("lot_type") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => {
                return Err(RecordError::MissingField {
                    carpark_number,
                    field: "lot_type",
                });
            }
            Some(other) => other.to_string(),
        };

        Ok(Self {
            carpark_number,
            total_lots,
            lots_available,
            lot_type,
            update_datetime,
        })
    }
}

/// Read an integer that the feed may deliver either as a number or a numeric string
fn integer_field(
    info: &Value,
    field: &'static str,
    carpark_number: &str,
) -> Result<i64, RecordError> {
    let invalid = |value: String| RecordError::InvalidField {
        carpark_number: carpark_number.to_string(),
        field,
        value,
    };

    match info.get(field) {
        Some(Value::Number(n)) => n.as_i64().ok_or_else(|| invalid(n.to_string())),
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid(s.clone())),
        Some(Value::Null) | None => Err(RecordError::MissingField {
            carpark_number: carpark_number.to_string(),
            field,
        }),
        Some(other) => Err(invalid(other.to_string())),
    }
}

// =============================================================================
// Pipeline Output
// =============================================================================

/// A live reading joined with its registry row and geocoded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub carpark_number: String,
    pub total_lots: u32,
    pub lots_available: i64,
    pub lot_type: String,
    pub update_datetime: String,

    /// Registry address, or the unknown-address sentinel
    pub address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_coord: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_coord: Option<String>,

    /// WGS84 position, present only when the local pair was transformable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps: Option<GeoCoordinate>,

    /// Parsed `update_datetime`, filled in by the freshness stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl EnrichedRecord {
    /// Whether both local coordinates were carried over from the registry
    pub fn has_local_coordinates(&self) -> bool {
        self.x_coord.is_some() && self.y_coord.is_some()
    }

    /// Numeric local position, if both coordinates are present and parseable
    pub fn local_position(&self) -> Result<(f64, f64), TransformError> {
        parse_local_pair(self.x_coord.as_deref(), self.y_coord.as_deref())
    }
}
