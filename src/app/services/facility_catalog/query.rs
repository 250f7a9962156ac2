//! Facility lookup and search functionality
//!
//! Alternative query paths over the catalog: address search and proximity
//! search. Neither touches the live feed.

use super::FacilityCatalog;
use crate::app::models::{FacilityRecord, GeoCoordinate};
use crate::app::services::coordinate_transformer::to_local;
use crate::error::TransformError;

/// A facility paired with its distance from a query point
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyFacility<'a> {
    pub facility: &'a FacilityRecord,
    pub distance_metres: f64,
}

impl FacilityCatalog {
    /// All carpark numbers in load order
    pub fn identifiers(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|facility| facility.car_park_no.as_str())
            .collect()
    }

    /// Find facilities by address pattern (case-insensitive)
    ///
    /// # Examples
    /// ```
    /// # use carpark_locator::app::models::FacilityRecord;
    /// # use carpark_locator::app::services::facility_catalog::FacilityCatalog;
    /// let catalog = FacilityCatalog::from_records(
    ///     "inline",
    ///     vec![FacilityRecord::new("ACB", "BLK 270/271 ALBERT CENTRE", "30314.7936", "31490.4942")],
    /// );
    /// assert_eq!(catalog.find_by_address("albert").len(), 1);
    /// ```
    pub fn find_by_address(&self, pattern: &str) -> Vec<&FacilityRecord> {
        let pattern_lower = pattern.to_lowercase();
        self.records
            .iter()
            .filter(|facility| facility.address.to_lowercase().contains(&pattern_lower))
            .collect()
    }

    /// Find facilities within `radius_metres` of a WGS84 point, nearest first
    ///
    /// The query point is projected into SVY21 and distances are planar in
    /// that grid. Facilities whose registry coordinates are unusable are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns `TransformError` if the query point cannot be projected.
    pub fn find_near(
        &self,
        center: GeoCoordinate,
        radius_metres: f64,
    ) -> Result<Vec<NearbyFacility<'_>>, TransformError> {
        let (cx, cy) = to_local(center)?;

        let mut nearby: Vec<NearbyFacility<'_>> = self
            .records
            .iter()
            .filter_map(|facility| {
                let (x, y) = facility.local_position().ok()?;
                let distance_metres = (x - cx).hypot(y - cy);
                (distance_metres <= radius_metres).then_some(NearbyFacility {
                    facility,
                    distance_metres,
                })
            })
            .collect();

        nearby.sort_by(|a, b| a.distance_metres.total_cmp(&b.distance_metres));
        Ok(nearby)
    }
}
