//! Tests for timestamp parsing and freshness filtering

use super::*;
use crate::app::models::EnrichedRecord;
use crate::app::services::enrichment_pipeline::PipelineStats;
use crate::app::services::enrichment_pipeline::freshness_filter::{
    Freshness, apply_freshness_filter, classify, parse_update_datetime,
};
use chrono::{Duration, FixedOffset};

fn sgt() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
}

fn record(carpark_number: &str, updated: &str) -> EnrichedRecord {
    EnrichedRecord {
        carpark_number: carpark_number.to_string(),
        total_lots: 10,
        lots_available: 3,
        lot_type: "C".to_string(),
        update_datetime: updated.to_string(),
        address: "unknown".to_string(),
        x_coord: None,
        y_coord: None,
        gps: None,
        updated_at: None,
    }
}

#[test]
fn test_parse_zone_less_timestamp_uses_feed_offset() {
    let parsed = parse_update_datetime("2024-03-01T10:14:40", sgt()).unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 2, 14, 40).unwrap());

    let spaced = parse_update_datetime("2024-03-01 10:14:40", sgt()).unwrap();
    assert_eq!(spaced, parsed);
}

#[test]
fn test_parse_timestamp_with_offset() {
    let parsed = parse_update_datetime("2024-03-01T10:14:40+08:00", sgt()).unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 2, 14, 40).unwrap());

    let utc = parse_update_datetime("2024-03-01T02:14:40Z", sgt()).unwrap();
    assert_eq!(utc, parsed);
}

#[test]
fn test_parse_rejects_garbage() {
    assert!(parse_update_datetime("yesterday", sgt()).is_err());
    assert!(parse_update_datetime("", sgt()).is_err());
}

#[test]
fn test_classify() {
    let threshold = Duration::hours(24);

    assert!(matches!(
        classify(RECENT, test_now(), threshold, sgt()),
        Freshness::Fresh(_)
    ));

    match classify(THREE_DAYS_AGO, test_now(), threshold, sgt()) {
        Freshness::Stale { age, .. } => assert_eq!(age, Duration::days(3)),
        other => panic!("expected stale, got {other:?}"),
    }

    assert!(matches!(
        classify("not a date", test_now(), threshold, sgt()),
        Freshness::Unparseable(_)
    ));
}

#[test]
fn test_threshold_boundary_is_inclusive() {
    // Exactly 24 hours old
    let boundary = "2024-02-29T20:00:00";
    assert!(matches!(
        classify(boundary, test_now(), Duration::hours(24), sgt()),
        Freshness::Fresh(_)
    ));

    let just_over = "2024-02-29T19:59:59";
    assert!(matches!(
        classify(just_over, test_now(), Duration::hours(24), sgt()),
        Freshness::Stale { .. }
    ));
}

#[test]
fn test_future_timestamps_are_kept() {
    let future = "2024-03-02T09:00:00";
    assert!(matches!(
        classify(future, test_now(), Duration::hours(24), sgt()),
        Freshness::Fresh(_)
    ));
}

#[test]
fn test_apply_filter_counts_and_stamps() {
    let records = vec![
        record("A", RECENT),
        record("B", THREE_DAYS_AGO),
        record("C", "garbage"),
        record("D", "2024-03-01T11:30:00Z"),
    ];
    let mut stats = PipelineStats::new();

    let fresh = apply_freshness_filter(records, test_now(), Duration::hours(24), sgt(), &mut stats);

    let ids: Vec<&str> = fresh.iter().map(|r| r.carpark_number.as_str()).collect();
    assert_eq!(ids, vec!["A", "D"]);
    assert_eq!(stats.stale_dropped, 1);
    assert_eq!(stats.unparseable_timestamps, 1);
    assert_eq!(
        fresh[0].updated_at,
        Some(Utc.with_ymd_and_hms(2024, 3, 1, 11, 50, 0).unwrap())
    );
}
