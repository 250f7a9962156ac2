//! Availability command implementation
//!
//! Runs the enrichment pipeline once and prints the records as a JSON array.
//! Scheduling repeated runs is left to the caller (cron, a systemd timer, a
//! map front-end polling the binary).

use super::shared::{CommandOutcome, print_json};
use crate::app::services::enrichment_pipeline::{EnrichmentPipeline, PipelineResult};
use crate::app::services::facility_catalog::{CatalogMetadata, FacilityCatalog};
use crate::app::services::feed_source::{FeedSource, HttpFeedSource, SnapshotFeedSource};
use crate::cli::args::AvailabilityArgs;
use crate::Result;
use colored::Colorize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Availability command runner
pub async fn run_availability(args: AvailabilityArgs) -> Result<CommandOutcome> {
    let start_time = Instant::now();
    debug!("Availability arguments: {:?}", args);

    let config = args.to_config()?;

    let catalog = Arc::new(FacilityCatalog::load_or_empty(&args.catalog));
    let source: Arc<dyn FeedSource> = match &args.feed_file {
        Some(path) => Arc::new(SnapshotFeedSource::new(path)),
        None => Arc::new(HttpFeedSource::new(&config)?),
    };

    let pipeline = EnrichmentPipeline::new(catalog, source, config);
    let result = pipeline.run_with_stats().await?;

    print_json(&result.records, args.pretty)?;

    if args.stats {
        print_summary(&result, &pipeline.catalog().metadata());
    }

    info!(
        "Availability run finished in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(CommandOutcome::Completed)
}

/// Print a per-stage summary on stderr
fn print_summary(result: &PipelineResult, catalog: &CatalogMetadata) {
    let stats = &result.stats;

    eprintln!();
    eprintln!("{}", "Availability Summary".bold().blue());
    eprintln!("{}", "=".repeat(40).blue());
    eprintln!("Evaluated at:        {}", result.evaluated_at.to_rfc3339());
    eprintln!(
        "Catalog facilities:  {} (loaded {:.2}s ago from {})",
        catalog.facility_count,
        catalog.age().as_secs_f64(),
        catalog.source_name
    );
    eprintln!("Feed entries:        {}", stats.raw_entries);
    eprintln!("Duplicates dropped:  {}", stats.duplicates_dropped);
    eprintln!("Malformed dropped:   {}", stats.malformed_dropped);
    eprintln!(
        "Catalog matches:     {} ({:.1}%)",
        stats.matched,
        stats.match_rate()
    );
    eprintln!(
        "Geocoded:            {} ({} failed)",
        stats.geocoded, stats.geocode_failures
    );
    eprintln!(
        "Stale dropped:       {} ({} unparseable)",
        stats.stale_dropped, stats.unparseable_timestamps
    );

    let output_line = format!("Records returned:    {}", stats.final_output);
    if stats.final_output == 0 {
        eprintln!("{}", output_line.yellow().bold());
    } else {
        eprintln!("{}", output_line.green().bold());
    }

    if stats.unmatched > 0 {
        eprintln!(
            "{}",
            format!(
                "{} readings have no registry entry and no location",
                stats.unmatched
            )
            .yellow()
        );
    }
}
