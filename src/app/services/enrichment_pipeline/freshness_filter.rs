//! Freshness filtering of enriched records
//!
//! A reading older than the freshness threshold is dropped. Readings whose
//! timestamp cannot be parsed are treated as maximally stale and dropped too.
//! Timestamps dated in the future are kept.

use crate::app::models::EnrichedRecord;
use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone, Utc};
use tracing::{debug, info};

use super::stats::PipelineStats;

/// Zone-less layouts the feed has been seen to use
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Classification of a record's age
#[derive(Debug, Clone, PartialEq)]
pub enum Freshness {
    Fresh(DateTime<Utc>),
    Stale { updated_at: DateTime<Utc>, age: Duration },
    Unparseable(String),
}

/// Parse a feed timestamp
///
/// RFC 3339 text is taken at its stated offset; text without an offset is
/// interpreted at `feed_offset`.
pub fn parse_update_datetime(
    raw: &str,
    feed_offset: FixedOffset,
) -> Result<DateTime<Utc>, chrono::ParseError> {
    let raw = raw.trim();
    let rfc3339_error = match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => return Ok(parsed.with_timezone(&Utc)),
        Err(e) => e,
    };

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            if let Some(local) = feed_offset.from_local_datetime(&naive).single() {
                return Ok(local.with_timezone(&Utc));
            }
        }
    }

    Err(rfc3339_error)
}

/// Classify a raw timestamp against `now`
pub fn classify(
    raw: &str,
    now: DateTime<Utc>,
    threshold: Duration,
    feed_offset: FixedOffset,
) -> Freshness {
    match parse_update_datetime(raw, feed_offset) {
        Ok(updated_at) => {
            let age = now - updated_at;
            if age > threshold {
                Freshness::Stale { updated_at, age }
            } else {
                Freshness::Fresh(updated_at)
            }
        }
        Err(e) => Freshness::Unparseable(e.to_string()),
    }
}

/// Drop records older than `threshold`, stamping survivors with `updated_at`
///
/// # Arguments
///
/// * `records` - Enriched records to filter
/// * `now` - Instant to measure age against
/// * `threshold` - Maximum accepted age
/// * `feed_offset` - Offset for zone-less timestamps
/// * `stats` - Mutable reference to pipeline statistics
pub fn apply_freshness_filter(
    records: Vec<EnrichedRecord>,
    now: DateTime<Utc>,
    threshold: Duration,
    feed_offset: FixedOffset,
    stats: &mut PipelineStats,
) -> Vec<EnrichedRecord> {
    let input = records.len();
    let mut fresh = Vec::with_capacity(input);

    for mut record in records {
        match classify(&record.update_datetime, now, threshold, feed_offset) {
            Freshness::Fresh(updated_at) => {
                record.updated_at = Some(updated_at);
                fresh.push(record);
            }
            Freshness::Stale { age, .. } => {
                debug!(
                    "Carpark {} filtered out: last update {}h old",
                    record.carpark_number,
                    age.num_hours()
                );
                stats.stale_dropped += 1;
            }
            Freshness::Unparseable(reason) => {
                debug!(
                    "Carpark {} filtered out: unparseable update_datetime '{}' ({})",
                    record.carpark_number, record.update_datetime, reason
                );
                stats.unparseable_timestamps += 1;
            }
        }
    }

    info!(
        "Freshness filtering complete: {} -> {} records ({} stale, {} unparseable)",
        input,
        fresh.len(),
        stats.stale_dropped,
        stats.unparseable_timestamps
    );

    fresh
}
