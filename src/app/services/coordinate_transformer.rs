//! SVY21 to WGS84 coordinate transformation
//!
//! The carpark registry publishes facility positions in SVY21, Singapore's
//! transverse Mercator grid. This module converts them to latitude/longitude
//! with the Redfearn series expansion on the WGS84 ellipsoid, and provides
//! the forward direction for proximity queries.
//!
//! All functions are pure and safe to call from any number of threads.

use crate::app::models::{EnrichedRecord, GeoCoordinate};
use crate::constants::svy21::{
    FALSE_EASTING, FALSE_NORTHING, FLATTENING, MAX_ORIGIN_OFFSET_METRES, ORIGIN_LATITUDE,
    ORIGIN_LONGITUDE, SCALE_FACTOR, SEMI_MAJOR_AXIS,
};
use crate::error::TransformError;
use tracing::{debug, info};

/// First eccentricity squared
fn eccentricity_squared() -> f64 {
    2.0 * FLATTENING - FLATTENING * FLATTENING
}

/// Meridian arc length from the equator to `latitude_rad`
fn meridian_distance(latitude_rad: f64) -> f64 {
    let e2 = eccentricity_squared();
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    let a0 = 1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0;
    let a2 = 3.0 / 8.0 * (e2 + e4 / 4.0 + 15.0 * e6 / 128.0);
    let a4 = 15.0 / 256.0 * (e4 + 3.0 * e6 / 4.0);
    let a6 = 35.0 * e6 / 3072.0;

    SEMI_MAJOR_AXIS
        * (a0 * latitude_rad - a2 * (2.0 * latitude_rad).sin() + a4 * (4.0 * latitude_rad).sin()
            - a6 * (6.0 * latitude_rad).sin())
}

/// Radius of curvature in the meridian
fn meridian_radius(sin2_lat: f64) -> f64 {
    let e2 = eccentricity_squared();
    SEMI_MAJOR_AXIS * (1.0 - e2) / (1.0 - e2 * sin2_lat).powf(1.5)
}

/// Radius of curvature in the prime vertical
fn prime_vertical_radius(sin2_lat: f64) -> f64 {
    SEMI_MAJOR_AXIS / (1.0 - eccentricity_squared() * sin2_lat).sqrt()
}

/// Parse a raw registry coordinate pair
///
/// Both values must be present, non-empty and numeric. Non-finite values
/// ("NaN", "inf") parse here and are rejected by [`transform`].
pub fn parse_local_pair(x: Option<&str>, y: Option<&str>) -> Result<(f64, f64), TransformError> {
    let x = parse_axis("x", x)?;
    let y = parse_axis("y", y)?;
    Ok((x, y))
}

fn parse_axis(axis: &'static str, raw: Option<&str>) -> Result<f64, TransformError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    match raw {
        None => Err(TransformError::Missing { axis }),
        Some(value) => value.parse::<f64>().map_err(|_| TransformError::Unparseable {
            axis,
            value: value.to_string(),
        }),
    }
}

/// Convert an SVY21 easting/northing pair to WGS84 latitude/longitude
///
/// # Arguments
///
/// * `x` - SVY21 easting in metres
/// * `y` - SVY21 northing in metres
///
/// # Errors
///
/// * `TransformError::NonFinite` for NaN or infinite input
/// * `TransformError::OutOfDomain` when the point is too far from the
///   projection origin or the result is not a valid position
pub fn transform(x: f64, y: f64) -> Result<GeoCoordinate, TransformError> {
    if !x.is_finite() || !y.is_finite() {
        return Err(TransformError::NonFinite { x, y });
    }

    let easting = x - FALSE_EASTING;
    let northing = y - FALSE_NORTHING;
    if easting.abs() > MAX_ORIGIN_OFFSET_METRES || northing.abs() > MAX_ORIGIN_OFFSET_METRES {
        return Err(TransformError::OutOfDomain { x, y });
    }

    let k = SCALE_FACTOR;
    let a = SEMI_MAJOR_AXIS;
    let b = a * (1.0 - FLATTENING);

    // Footpoint latitude
    let m_prime = meridian_distance(ORIGIN_LATITUDE.to_radians()) + northing / k;
    let n = (a - b) / (a + b);
    let n2 = n * n;
    let n3 = n2 * n;
    let n4 = n2 * n2;
    let sigma = m_prime / (a * (1.0 - n) * (1.0 - n2) * (1.0 + 9.0 * n2 / 4.0 + 225.0 * n4 / 64.0));
    let lat_prime = sigma
        + (3.0 * n / 2.0 - 27.0 * n3 / 32.0) * (2.0 * sigma).sin()
        + (21.0 * n2 / 16.0 - 55.0 * n4 / 32.0) * (4.0 * sigma).sin()
        + (151.0 * n3 / 96.0) * (6.0 * sigma).sin()
        + (1097.0 * n4 / 512.0) * (8.0 * sigma).sin();

    let sin2_lat = lat_prime.sin().powi(2);
    let rho = meridian_radius(sin2_lat);
    let nu = prime_vertical_radius(sin2_lat);
    let psi = nu / rho;
    let psi2 = psi * psi;
    let psi3 = psi2 * psi;
    let psi4 = psi2 * psi2;

    let sec_lat = 1.0 / lat_prime.cos();
    let t = lat_prime.tan();
    let t2 = t * t;
    let t4 = t2 * t2;
    let t6 = t4 * t2;

    let xr = easting / (k * nu);
    let x3 = xr.powi(3);
    let x5 = xr.powi(5);
    let x7 = xr.powi(7);

    let lat_factor = t / (k * rho);
    let lat_term1 = lat_factor * (easting * xr / 2.0);
    let lat_term2 = lat_factor
        * (easting * x3 / 24.0)
        * (-4.0 * psi2 + 9.0 * psi * (1.0 - t2) + 12.0 * t2);
    let lat_term3 = lat_factor
        * (easting * x5 / 720.0)
        * (8.0 * psi4 * (11.0 - 24.0 * t2) - 12.0 * psi3 * (21.0 - 71.0 * t2)
            + 15.0 * psi2 * (15.0 - 98.0 * t2 + 15.0 * t4)
            + 180.0 * psi * (5.0 * t2 - 3.0 * t4)
            + 360.0 * t4);
    let lat_term4 = lat_factor
        * (easting * x7 / 40320.0)
        * (1385.0 + 3633.0 * t2 + 4095.0 * t4 + 1575.0 * t6);
    let latitude = lat_prime - lat_term1 + lat_term2 - lat_term3 + lat_term4;

    let lon_term1 = xr * sec_lat;
    let lon_term2 = x3 * sec_lat / 6.0 * (psi + 2.0 * t2);
    let lon_term3 = x5 * sec_lat / 120.0
        * (-4.0 * psi3 * (1.0 - 6.0 * t2) + psi2 * (9.0 - 68.0 * t2) + 72.0 * psi * t2 + 24.0 * t4);
    let lon_term4 = x7 * sec_lat / 5040.0 * (61.0 + 662.0 * t2 + 1320.0 * t4 + 720.0 * t6);
    let longitude =
        ORIGIN_LONGITUDE.to_radians() + lon_term1 - lon_term2 + lon_term3 - lon_term4;

    let coordinate = GeoCoordinate::new(latitude.to_degrees(), longitude.to_degrees());
    if !coordinate.is_valid() {
        return Err(TransformError::OutOfDomain { x, y });
    }

    Ok(coordinate)
}

/// Like [`transform`], but logs the failure and returns `None`
pub fn try_transform(x: f64, y: f64) -> Option<GeoCoordinate> {
    match transform(x, y) {
        Ok(coordinate) => Some(coordinate),
        Err(e) => {
            debug!("Coordinate transformation failed: {}", e);
            None
        }
    }
}

/// Convert WGS84 latitude/longitude to an SVY21 (x, y) pair in metres
pub fn to_local(coordinate: GeoCoordinate) -> Result<(f64, f64), TransformError> {
    if !coordinate.latitude.is_finite() || !coordinate.longitude.is_finite() {
        return Err(TransformError::NonFinite {
            x: coordinate.longitude,
            y: coordinate.latitude,
        });
    }
    if !coordinate.is_valid() || (coordinate.longitude - ORIGIN_LONGITUDE).abs() > 10.0 {
        return Err(TransformError::OutOfDomain {
            x: coordinate.longitude,
            y: coordinate.latitude,
        });
    }

    let k = SCALE_FACTOR;
    let lat = coordinate.latitude.to_radians();
    let sin_lat = lat.sin();
    let sin2_lat = sin_lat * sin_lat;
    let cos_lat = lat.cos();

    let rho = meridian_radius(sin2_lat);
    let nu = prime_vertical_radius(sin2_lat);
    let psi = nu / rho;
    let psi2 = psi * psi;
    let psi3 = psi2 * psi;
    let psi4 = psi2 * psi2;

    let t = lat.tan();
    let t2 = t * t;
    let t4 = t2 * t2;
    let t6 = t4 * t2;

    let w = (coordinate.longitude - ORIGIN_LONGITUDE).to_radians();
    let w2 = w * w;
    let w4 = w2 * w2;
    let w6 = w4 * w2;
    let w8 = w4 * w4;

    let n_term1 = w2 / 2.0 * nu * sin_lat * cos_lat;
    let n_term2 = w4 / 24.0 * nu * sin_lat * cos_lat.powi(3) * (4.0 * psi2 + psi - t2);
    let n_term3 = w6 / 720.0
        * nu
        * sin_lat
        * cos_lat.powi(5)
        * (8.0 * psi4 * (11.0 - 24.0 * t2) - 28.0 * psi3 * (1.0 - 6.0 * t2)
            + psi2 * (1.0 - 32.0 * t2)
            - psi * 2.0 * t2
            + t4);
    let n_term4 = w8 / 40320.0
        * nu
        * sin_lat
        * cos_lat.powi(7)
        * (1385.0 - 3111.0 * t2 + 543.0 * t4 - t6);
    let northing = FALSE_NORTHING
        + k * (meridian_distance(lat) - meridian_distance(ORIGIN_LATITUDE.to_radians())
            + n_term1
            + n_term2
            + n_term3
            + n_term4);

    let e_term1 = w2 / 6.0 * cos_lat.powi(2) * (psi - t2);
    let e_term2 = w4 / 120.0
        * cos_lat.powi(4)
        * (4.0 * psi3 * (1.0 - 6.0 * t2) + psi2 * (1.0 + 8.0 * t2) - psi * 2.0 * t2 + t4);
    let e_term3 = w6 / 5040.0 * cos_lat.powi(6) * (61.0 - 479.0 * t2 + 179.0 * t4 - t6);
    let easting = FALSE_EASTING + k * nu * w * cos_lat * (1.0 + e_term1 + e_term2 + e_term3);

    Ok((easting, northing))
}

/// Geocode every record that carries both local coordinates
///
/// Records without both coordinates are left untouched. A failed transform
/// leaves `gps` absent on that record and never affects the others.
///
/// # Returns
///
/// Number of records that received a geographic position
pub fn transform_all(records: &mut [EnrichedRecord]) -> usize {
    let mut geocoded = 0;
    let mut failed = 0;

    for record in records.iter_mut().filter(|r| r.has_local_coordinates()) {
        let outcome = record
            .local_position()
            .and_then(|(x, y)| transform(x, y));

        match outcome {
            Ok(coordinate) => {
                record.gps = Some(coordinate);
                geocoded += 1;
            }
            Err(e) => {
                debug!(
                    "Carpark {} left without GPS position: {}",
                    record.carpark_number, e
                );
                record.gps = None;
                failed += 1;
            }
        }
    }

    info!(
        "Geocoding complete: {} records positioned, {} transforms failed",
        geocoded, failed
    );

    geocoded
}
