//! Enrichment pipeline orchestration
//!
//! Coordinates one run: fetch, deduplicate, validate, join, geocode and
//! filter by freshness. Only the fetch can fail the run; every later stage
//! works record by record.

use crate::app::models::{EnrichedRecord, FeedDocument};
use crate::app::services::coordinate_transformer::transform_all;
use crate::app::services::facility_catalog::FacilityCatalog;
use crate::app::services::feed_source::FeedSource;
use crate::config::PipelineConfig;
use crate::error::FetchError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use super::{
    clock::{Clock, SystemClock},
    deduplication::deduplicate_entries,
    enrichment::join_with_catalog,
    freshness_filter::apply_freshness_filter,
    stats::{PipelineResult, PipelineStats},
    validation::validate_entries,
};

/// Enrichment pipeline for live carpark availability
///
/// The pipeline holds no per-run state: each call to [`run`](Self::run) builds
/// its own deduplication set and output, so overlapping runs are safe. The
/// catalog is shared read-only.
///
/// # Example
///
/// ```rust,no_run
/// use std::path::Path;
/// use std::sync::Arc;
/// use carpark_locator::app::services::enrichment_pipeline::EnrichmentPipeline;
/// use carpark_locator::app::services::facility_catalog::FacilityCatalog;
/// use carpark_locator::app::services::feed_source::HttpFeedSource;
/// use carpark_locator::config::PipelineConfig;
///
/// # async fn example() -> carpark_locator::Result<()> {
/// let config = PipelineConfig::default().with_fetch_timeout_ms(10_000);
/// let catalog = Arc::new(FacilityCatalog::load_or_empty(Path::new("data/HDBCarparkInformation.csv")));
/// let source = Arc::new(HttpFeedSource::new(&config)?);
///
/// let pipeline = EnrichmentPipeline::new(catalog, source, config);
/// let records = pipeline.run().await?;
/// println!("{} carparks with fresh availability", records.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EnrichmentPipeline {
    /// Read-only facility registry
    catalog: Arc<FacilityCatalog>,
    /// Where the raw feed comes from
    source: Arc<dyn FeedSource>,
    /// Source of "now" for the freshness filter
    clock: Arc<dyn Clock>,
    /// Pipeline configuration
    config: PipelineConfig,
}

impl EnrichmentPipeline {
    /// Create a pipeline using the system clock
    ///
    /// # Arguments
    ///
    /// * `catalog` - Facility catalog, loaded once at start-up
    /// * `source` - Feed source queried once per run
    /// * `config` - Pipeline configuration
    pub fn new(
        catalog: Arc<FacilityCatalog>,
        source: Arc<dyn FeedSource>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            catalog,
            source,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Run the pipeline and return the enriched records
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the feed cannot be fetched or has no reading
    /// groups. No partial output is produced in that case.
    pub async fn run(&self) -> Result<Vec<EnrichedRecord>, FetchError> {
        Ok(self.run_with_stats().await?.records)
    }

    /// Run the pipeline and return records together with stage statistics
    pub async fn run_with_stats(&self) -> Result<PipelineResult, FetchError> {
        info!("Starting enrichment run against {}", self.source.origin());

        let document = self.source.fetch().await?;
        let now = self.clock.now();

        let result = self.process(&document, now)?;

        info!(
            "Enrichment run complete: {} -> {} records ({:.1}% returned)",
            result.stats.raw_entries,
            result.stats.final_output,
            result.stats.success_rate()
        );
        debug!("{}", result.summary());

        Ok(result)
    }

    /// Apply the per-record stages to an already fetched document
    ///
    /// This is a pure function of the document, the catalog and `now`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::MalformedFeed` if the document has no reading groups.
    pub fn process(
        &self,
        document: &FeedDocument,
        now: DateTime<Utc>,
    ) -> Result<PipelineResult, FetchError> {
        let group = document.first_group().ok_or_else(|| {
            FetchError::malformed(self.source.origin(), "feed contains no reading groups")
        })?;

        let mut stats = PipelineStats::new();
        stats.raw_entries = group.carpark_data.len();

        // Step 1: First occurrence of each carpark number wins
        let unique = deduplicate_entries(&group.carpark_data, &mut stats);

        // Step 2: Typed readings; malformed entries are dropped
        let entries = validate_entries(unique, &mut stats);

        // Step 3: Join with the facility catalog
        let mut records = join_with_catalog(
            entries,
            &self.catalog,
            &self.config.unknown_address,
            &mut stats,
        );

        // Step 4: SVY21 -> WGS84 where both coordinates are usable
        let with_local = records.iter().filter(|r| r.has_local_coordinates()).count();
        stats.geocoded = transform_all(&mut records);
        stats.geocode_failures = with_local - stats.geocoded;

        // Step 5: Drop stale readings
        let records = apply_freshness_filter(
            records,
            now,
            self.config.freshness_threshold(),
            self.config.feed_offset(),
            &mut stats,
        );
        stats.final_output = records.len();

        Ok(PipelineResult::new(records, stats, now))
    }

    /// Get the facility catalog used by this pipeline
    pub fn catalog(&self) -> &FacilityCatalog {
        &self.catalog
    }

    /// Get the pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
