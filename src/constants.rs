//! Application constants for the carpark locator
//!
//! This module contains the fixed endpoint, projection parameters, catalog
//! column names and default values used throughout the crate.

// =============================================================================
// Live Feed
// =============================================================================

/// Live carpark availability endpoint published by data.gov.sg
pub const DEFAULT_FEED_URL: &str = "https://api.data.gov.sg/v1/transport/carpark-availability";

/// User agent sent with feed requests
pub const DEFAULT_USER_AGENT: &str = concat!("carpark-locator/", env!("CARGO_PKG_VERSION"));

/// Readings older than this are considered stale
pub const FRESHNESS_THRESHOLD_HOURS: i64 = 24;

/// Offset applied to feed timestamps that carry no zone designator (Singapore time)
pub const FEED_UTC_OFFSET_HOURS: i32 = 8;

/// Address reported for facilities absent from the catalog
pub const UNKNOWN_ADDRESS: &str = "unknown";

// =============================================================================
// Static Catalog
// =============================================================================

/// Default location of the HDB carpark information registry
pub const DEFAULT_CATALOG_PATH: &str = "data/HDBCarparkInformation.csv";

/// Required catalog columns
pub mod catalog_columns {
    pub const IDENTIFIER: &str = "car_park_no";
    pub const ADDRESS: &str = "address";
    pub const X_COORD: &str = "x_coord";
    pub const Y_COORD: &str = "y_coord";

    pub const REQUIRED: &[&str] = &[IDENTIFIER, ADDRESS, X_COORD, Y_COORD];
}

// =============================================================================
// SVY21 Projection
// =============================================================================

/// Singapore SVY21 transverse Mercator parameters on the WGS84 ellipsoid
pub mod svy21 {
    /// WGS84 semi-major axis (metres)
    pub const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

    /// WGS84 flattening
    pub const FLATTENING: f64 = 1.0 / 298.257_223_563;

    /// Latitude of origin, 1°22'N
    pub const ORIGIN_LATITUDE: f64 = 1.366_666_666_666_667;

    /// Central meridian, 103°50'E
    pub const ORIGIN_LONGITUDE: f64 = 103.833_333_333_333_3;

    /// False northing (metres)
    pub const FALSE_NORTHING: f64 = 38_744.572;

    /// False easting (metres)
    pub const FALSE_EASTING: f64 = 28_001.642;

    /// Scale factor on the central meridian
    pub const SCALE_FACTOR: f64 = 1.0;

    /// Largest offset from the false origin accepted by the series expansion
    pub const MAX_ORIGIN_OFFSET_METRES: f64 = 1_000_000.0;
}
