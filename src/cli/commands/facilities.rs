//! Facilities command implementation
//!
//! Lists the registry, optionally narrowed by address substring and/or
//! distance from a point.

use super::shared::{CommandOutcome, load_catalog, print_json};
use crate::app::models::{FacilityRecord, GeoCoordinate};
use crate::app::services::facility_catalog::FacilityCatalog;
use crate::cli::args::FacilitiesArgs;
use crate::Result;
use serde::Serialize;
use tracing::{debug, info};

/// One listed facility; distance is present for proximity searches
#[derive(Debug, Serialize)]
pub struct FacilityListing<'a> {
    #[serde(flatten)]
    pub facility: &'a FacilityRecord,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_metres: Option<f64>,
}

/// Facilities command runner
pub fn run_facilities(args: FacilitiesArgs) -> Result<CommandOutcome> {
    debug!("Facilities arguments: {:?}", args);
    args.validate()?;

    let catalog = load_catalog(&args.catalog);
    let near = args.near.map(|lat_lon| lat_lon.0).zip(args.radius);
    let listings = select_facilities(&catalog, args.address.as_deref(), near)?;

    info!(
        "Listing {} of {} facilities",
        listings.len(),
        catalog.len()
    );

    print_json(&listings, args.pretty)?;
    Ok(CommandOutcome::Completed)
}

/// Apply the address and proximity filters
///
/// Proximity results are ordered nearest first; otherwise load order is kept.
pub fn select_facilities<'a>(
    catalog: &'a FacilityCatalog,
    address: Option<&str>,
    near: Option<(GeoCoordinate, f64)>,
) -> Result<Vec<FacilityListing<'a>>> {
    let matches_address = |facility: &FacilityRecord| match address {
        Some(pattern) => facility
            .address
            .to_lowercase()
            .contains(&pattern.to_lowercase()),
        None => true,
    };

    let listings = match near {
        Some((center, radius)) => catalog
            .find_near(center, radius)?
            .into_iter()
            .filter(|nearby| matches_address(nearby.facility))
            .map(|nearby| FacilityListing {
                facility: nearby.facility,
                distance_metres: Some(nearby.distance_metres),
            })
            .collect(),
        None => {
            let facilities: Vec<&FacilityRecord> = match address {
                Some(pattern) => catalog.find_by_address(pattern),
                None => catalog.list_all().collect(),
            };
            facilities
                .into_iter()
                .map(|facility| FacilityListing {
                    facility,
                    distance_metres: None,
                })
                .collect()
        }
    };

    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> FacilityCatalog {
        FacilityCatalog::from_records(
            "inline",
            vec![
                FacilityRecord::new("ACB", "BLK 270/271 ALBERT CENTRE BASEMENT CAR PARK", "30314.7936", "31490.4942"),
                FacilityRecord::new("ACM", "BLK 98A ALJUNIED CRESCENT", "33758.4143", "33695.5198"),
                FacilityRecord::new("AH1", "BLK 101 JALAN DUSUN", "29257.7203", "34500.3599"),
            ],
        )
    }

    #[test]
    fn test_select_all_in_load_order() {
        let catalog = catalog();
        let listings = select_facilities(&catalog, None, None).unwrap();

        let ids: Vec<&str> = listings.iter().map(|l| l.facility.car_park_no.as_str()).collect();
        assert_eq!(ids, vec!["ACB", "ACM", "AH1"]);
        assert!(listings.iter().all(|l| l.distance_metres.is_none()));
    }

    #[test]
    fn test_select_by_address() {
        let catalog = catalog();
        let listings = select_facilities(&catalog, Some("aljunied"), None).unwrap();

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].facility.car_park_no, "ACM");
    }

    #[test]
    fn test_select_near_point_with_address() {
        let catalog = catalog();
        let albert_centre = GeoCoordinate::new(1.3010633, 103.8541180);

        let nearby = select_facilities(&catalog, None, Some((albert_centre, 4000.0))).unwrap();
        assert_eq!(nearby[0].facility.car_park_no, "ACB");
        assert!(nearby[0].distance_metres.unwrap() < 1.0);

        let filtered =
            select_facilities(&catalog, Some("dusun"), Some((albert_centre, 4000.0))).unwrap();
        assert!(filtered.iter().all(|l| l.facility.car_park_no == "AH1"));
    }

    #[test]
    fn test_listing_serialization_flattens_facility() {
        let facility = FacilityRecord::new("ACB", "ALBERT CENTRE", "1", "2");
        let listing = FacilityListing {
            facility: &facility,
            distance_metres: Some(12.5),
        };

        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["car_park_no"], "ACB");
        assert_eq!(json["distance_metres"], 12.5);
    }
}
