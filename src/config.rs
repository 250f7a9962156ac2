//! Configuration management and validation.
//!
//! Provides the pipeline configuration: where the live feed is fetched from,
//! how long a fetch may take, and how stale a reading may be before it is
//! dropped.

use crate::constants::{
    DEFAULT_FEED_URL, DEFAULT_USER_AGENT, FEED_UTC_OFFSET_HOURS, FRESHNESS_THRESHOLD_HOURS,
    UNKNOWN_ADDRESS,
};
use crate::{Error, Result};
use chrono::{Duration, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for the enrichment pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Endpoint of the live availability feed
    pub feed_url: String,

    /// Abort the feed request after this many milliseconds (None = no limit)
    pub fetch_timeout_ms: Option<u64>,

    /// Maximum age of a reading before it is dropped
    pub freshness_threshold_hours: i64,

    /// Offset assumed for feed timestamps without a zone designator
    pub feed_utc_offset_hours: i32,

    /// Address reported for facilities missing from the catalog
    pub unknown_address: String,

    /// User agent sent with feed requests
    pub user_agent: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            fetch_timeout_ms: None,
            freshness_threshold_hours: FRESHNESS_THRESHOLD_HOURS,
            feed_utc_offset_hours: FEED_UTC_OFFSET_HOURS,
            unknown_address: UNKNOWN_ADDRESS.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Use a different feed endpoint
    pub fn with_feed_url(mut self, feed_url: impl Into<String>) -> Self {
        self.feed_url = feed_url.into();
        self
    }

    /// Abort the feed request after `timeout_ms` milliseconds
    pub fn with_fetch_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.fetch_timeout_ms = Some(timeout_ms);
        self
    }

    /// Override the staleness threshold
    pub fn with_freshness_threshold_hours(mut self, hours: i64) -> Self {
        self.freshness_threshold_hours = hours;
        self
    }

    /// Override the offset assumed for zone-less feed timestamps
    pub fn with_feed_utc_offset_hours(mut self, hours: i32) -> Self {
        self.feed_utc_offset_hours = hours;
        self
    }

    /// Freshness threshold as a duration
    ///
    /// Saturates at the largest representable duration for hour counts that
    /// `validate()` would reject.
    pub fn freshness_threshold(&self) -> Duration {
        Duration::try_hours(self.freshness_threshold_hours).unwrap_or(Duration::MAX)
    }

    /// Offset assumed for zone-less feed timestamps (UTC when out of range)
    pub fn feed_offset(&self) -> FixedOffset {
        self.feed_utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or(Utc.fix())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.feed_url.trim().is_empty() {
            return Err(Error::configuration("feed_url cannot be empty"));
        }

        if self.fetch_timeout_ms == Some(0) {
            return Err(Error::configuration(
                "fetch_timeout_ms must be greater than zero",
            ));
        }

        if self.freshness_threshold_hours <= 0 {
            return Err(Error::configuration(format!(
                "freshness_threshold_hours must be positive, got {}",
                self.freshness_threshold_hours
            )));
        }

        if Duration::try_hours(self.freshness_threshold_hours).is_none() {
            return Err(Error::configuration(format!(
                "freshness_threshold_hours is too large, got {}",
                self.freshness_threshold_hours
            )));
        }

        if !(-23..=23).contains(&self.feed_utc_offset_hours) {
            return Err(Error::configuration(format!(
                "feed_utc_offset_hours must be within -23..=23, got {}",
                self.feed_utc_offset_hours
            )));
        }

        if self.unknown_address.is_empty() {
            return Err(Error::configuration("unknown_address cannot be empty"));
        }

        debug!("Pipeline configuration validated: {:?}", self);
        Ok(())
    }
}
