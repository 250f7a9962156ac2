//! Tests for the EnrichmentPipeline and end-to-end scenarios

use super::*;
use crate::app::services::enrichment_pipeline::Clock;
use crate::app::services::feed_source::FeedSource;
use crate::error::FetchError;
use async_trait::async_trait;

/// Feed source that always fails
#[derive(Debug)]
struct FailingSource;

#[async_trait]
impl FeedSource for FailingSource {
    async fn fetch(&self) -> Result<FeedDocument, FetchError> {
        Err(FetchError::Http {
            url: "http://feed.invalid".to_string(),
            status: 500,
        })
    }

    fn origin(&self) -> String {
        "http://feed.invalid".to_string()
    }
}

#[tokio::test]
async fn test_duplicate_entries_first_wins() {
    let pipeline = create_test_pipeline(vec![
        feed_entry("A", 10, 3, RECENT),
        feed_entry("A", 10, 7, RECENT),
    ]);

    let records = pipeline.run().await.unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.carpark_number, "A");
    assert_eq!(record.lots_available, 3);
    assert_eq!(record.address, "1 Main St");

    let gps = record.gps.expect("catalogued facility should be geocoded");
    assert!((gps.latitude - 1.3662636).abs() < 1e-5);
    assert!((gps.longitude - 103.8333186).abs() < 1e-5);
}

#[tokio::test]
async fn test_stale_entry_is_excluded() {
    let pipeline = create_test_pipeline(vec![feed_entry("A", 10, 3, THREE_DAYS_AGO)]);

    let result = pipeline.run_with_stats().await.unwrap();

    assert!(result.records.is_empty());
    assert_eq!(result.stats.stale_dropped, 1);
    assert_eq!(result.stats.final_output, 0);
}

#[tokio::test]
async fn test_unknown_facility_is_kept_without_location() {
    let pipeline = create_test_pipeline(vec![feed_entry("ZZ9", 40, 12, RECENT)]);

    let records = pipeline.run().await.unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.address, "unknown");
    assert!(record.x_coord.is_none());
    assert!(record.y_coord.is_none());
    assert!(record.gps.is_none());
    assert_eq!(record.lots_available, 12);
}

#[tokio::test]
async fn test_untransformable_coordinates_keep_record() {
    let pipeline = create_test_pipeline(vec![feed_entry("BAD", 10, 3, RECENT)]);

    let result = pipeline.run_with_stats().await.unwrap();

    assert_eq!(result.records.len(), 1);
    let record = &result.records[0];
    assert_eq!(record.address, "2 Side Rd");
    assert_eq!(record.x_coord.as_deref(), Some("not-a-number"));
    assert!(record.gps.is_none());
    assert_eq!(result.stats.geocoded, 0);
    assert_eq!(result.stats.geocode_failures, 1);
}

#[tokio::test]
async fn test_mixed_feed_statistics() {
    let mut malformed = feed_entry("M1", 10, 3, RECENT);
    malformed["carpark_info"] = json!("none");

    let pipeline = create_test_pipeline(vec![
        feed_entry("ACB", 105, 47, RECENT),
        feed_entry("A", 10, 3, RECENT),
        feed_entry("ACB", 105, 12, RECENT),
        malformed,
        feed_entry("ZZ9", 5, 1, RECENT),
        feed_entry("BAD", 10, 3, "not a timestamp"),
        feed_entry("OLD", 10, 3, THREE_DAYS_AGO),
    ]);

    let result = pipeline.run_with_stats().await.unwrap();
    let stats = &result.stats;

    assert_eq!(stats.raw_entries, 7);
    assert_eq!(stats.duplicates_dropped, 1);
    assert_eq!(stats.malformed_dropped, 1);
    assert_eq!(stats.matched, 3);
    assert_eq!(stats.unmatched, 2);
    assert_eq!(stats.geocoded, 2);
    assert_eq!(stats.geocode_failures, 1);
    assert_eq!(stats.unparseable_timestamps, 1);
    assert_eq!(stats.stale_dropped, 1);
    assert_eq!(stats.final_output, 3);

    let ids: Vec<&str> = result.records.iter().map(|r| r.carpark_number.as_str()).collect();
    assert_eq!(ids, vec!["ACB", "A", "ZZ9"]);
    assert_eq!(result.records[0].lots_available, 47);
    assert_eq!(result.evaluated_at, test_now());
}

#[tokio::test]
async fn test_output_identifiers_are_unique_and_fresh() {
    let entries = (0..50)
        .map(|i| feed_entry(&format!("C{}", i % 20), 10, i, RECENT))
        .collect();
    let pipeline = create_test_pipeline(entries);

    let result = pipeline.run_with_stats().await.unwrap();

    let mut ids: Vec<&str> = result.records.iter().map(|r| r.carpark_number.as_str()).collect();
    assert_eq!(ids.len(), 20);
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 20);

    let threshold = pipeline.config().freshness_threshold();
    assert!(result.records.iter().all(|r| {
        r.updated_at
            .map(|t| test_now() - t <= threshold)
            .unwrap_or(false)
    }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_runs_share_one_pipeline() {
    let pipeline = Arc::new(create_test_pipeline(vec![
        feed_entry("ACB", 105, 47, RECENT),
        feed_entry("A", 10, 3, RECENT),
        feed_entry("A", 10, 7, RECENT),
        feed_entry("ZZ9", 5, 1, RECENT),
        feed_entry("OLD", 10, 3, THREE_DAYS_AGO),
    ]));

    let first = tokio::spawn({
        let pipeline = Arc::clone(&pipeline);
        async move { pipeline.run_with_stats().await }
    });
    let second = tokio::spawn({
        let pipeline = Arc::clone(&pipeline);
        async move { pipeline.run_with_stats().await }
    });
    let (joined, local) = tokio::join!(
        async { (first.await.unwrap(), second.await.unwrap()) },
        pipeline.run_with_stats()
    );

    let first = joined.0.unwrap();
    let second = joined.1.unwrap();
    let local = local.unwrap();

    assert_eq!(first.records, second.records);
    assert_eq!(first.records, local.records);
    assert_eq!(first.stats, local.stats);

    // Each run keeps its own dedup state and counters
    for result in [&first, &second, &local] {
        assert_eq!(result.stats.raw_entries, 5);
        assert_eq!(result.stats.duplicates_dropped, 1);
        assert_eq!(result.stats.stale_dropped, 1);
        assert_eq!(result.record_count(), 3);
    }
    assert_eq!(first.records[1].lots_available, 3);
}

#[tokio::test]
async fn test_fetch_failure_propagates() {
    let pipeline = EnrichmentPipeline::new(
        create_test_catalog(),
        Arc::new(FailingSource),
        PipelineConfig::default(),
    );

    let result = pipeline.run().await;
    assert!(matches!(result, Err(FetchError::Http { status: 500, .. })));
}

#[tokio::test]
async fn test_feed_without_reading_groups_is_malformed() {
    let pipeline = EnrichmentPipeline::new(
        create_test_catalog(),
        Arc::new(StaticFeedSource::new(FeedDocument { items: Vec::new() })),
        PipelineConfig::default(),
    );

    let result = pipeline.run().await;
    assert!(matches!(result, Err(FetchError::MalformedFeed { .. })));
}

#[tokio::test]
async fn test_empty_reading_group_yields_empty_output() {
    let pipeline = create_test_pipeline(Vec::new());

    let result = pipeline.run_with_stats().await.unwrap();

    assert!(result.records.is_empty());
    assert_eq!(result.stats.raw_entries, 0);
    assert_eq!(result.stats.success_rate(), 100.0);
}

#[test]
fn test_process_is_deterministic() {
    let pipeline = create_test_pipeline(Vec::new());
    let document = feed_document(vec![
        feed_entry("ACB", 105, 47, RECENT),
        feed_entry("A", 10, 3, RECENT),
    ]);

    let first = pipeline.process(&document, test_now()).unwrap();
    let second = pipeline.process(&document, test_now()).unwrap();

    assert_eq!(first.records, second.records);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn test_freshness_depends_on_injected_time() {
    let pipeline = create_test_pipeline(Vec::new());
    let document = feed_document(vec![feed_entry("A", 10, 3, RECENT)]);

    let later = test_now() + chrono::Duration::days(2);
    assert_eq!(pipeline.process(&document, test_now()).unwrap().record_count(), 1);
    assert_eq!(pipeline.process(&document, later).unwrap().record_count(), 0);
}

#[test]
fn test_custom_threshold_and_sentinel() {
    let config = PipelineConfig {
        unknown_address: "n/a".to_string(),
        ..PipelineConfig::default()
    }
    .with_freshness_threshold_hours(1);
    let pipeline = EnrichmentPipeline::new(
        create_test_catalog(),
        Arc::new(StaticFeedSource::new(feed_document(Vec::new()))),
        config,
    );

    // Five hours old: fresh at the default threshold, stale at one hour
    let document = feed_document(vec![
        feed_entry("ZZ9", 5, 1, "2024-03-01T15:00:00"),
        feed_entry("ZZ8", 5, 1, RECENT),
    ]);
    let result = pipeline.process(&document, test_now()).unwrap();

    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].carpark_number, "ZZ8");
    assert_eq!(result.records[0].address, "n/a");
}

#[test]
fn test_fixed_clock() {
    let clock = FixedClock(test_now());
    assert_eq!(clock.now(), test_now());
    assert_eq!(create_test_pipeline(Vec::new()).catalog().len(), 3);
}
