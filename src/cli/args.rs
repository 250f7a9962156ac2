//! Command-line argument definitions for the carpark locator
//!
//! This module defines the CLI interface using the clap derive API.

use crate::app::models::GeoCoordinate;
use crate::config::PipelineConfig;
use crate::constants::DEFAULT_CATALOG_PATH;
use crate::{Error, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the carpark locator
///
/// Joins live HDB carpark availability with the static carpark registry and
/// reports geolocated, fresh readings.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "carpark",
    version,
    about = "Live HDB carpark availability joined with registry locations",
    long_about = "Fetches the live carpark availability feed, joins every reading with the \
                  static HDB carpark registry, converts SVY21 grid coordinates to WGS84 \
                  latitude/longitude and drops readings older than the freshness threshold."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the enrichment pipeline once and print the records as JSON
    Availability(AvailabilityArgs),
    /// Print one facility from the registry
    Details(DetailsArgs),
    /// List or search registry facilities
    Facilities(FacilitiesArgs),
}

/// Logging flags shared by every subcommand
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct Verbosity {
    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(short = 'q', long = "quiet", global = true, help = "Suppress all but error output")]
    pub quiet: bool,
}

impl Verbosity {
    /// Get the log level based on verbosity settings
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

/// Arguments for the availability command
#[derive(Debug, Clone, Parser)]
pub struct AvailabilityArgs {
    /// Path to the carpark registry CSV
    ///
    /// A missing or unreadable registry is not fatal: every reading is then
    /// reported with the unknown-address sentinel and no location.
    #[arg(
        short = 'c',
        long = "catalog",
        value_name = "PATH",
        default_value = DEFAULT_CATALOG_PATH,
        help = "Path to the carpark registry CSV"
    )]
    pub catalog: PathBuf,

    /// Live feed endpoint
    #[arg(
        long = "feed-url",
        value_name = "URL",
        conflicts_with = "feed_file",
        help = "Live availability feed endpoint"
    )]
    pub feed_url: Option<String>,

    /// Read a saved feed response instead of calling the live endpoint
    #[arg(
        long = "feed-file",
        value_name = "PATH",
        help = "Read a saved feed response instead of fetching"
    )]
    pub feed_file: Option<PathBuf>,

    /// Abort the feed request after this many milliseconds
    #[arg(
        long = "timeout-ms",
        value_name = "MS",
        help = "Abort the feed request after this many milliseconds"
    )]
    pub timeout_ms: Option<u64>,

    /// Maximum accepted age of a reading in hours
    #[arg(
        long = "max-age-hours",
        value_name = "HOURS",
        help = "Drop readings older than this many hours (default 24)"
    )]
    pub max_age_hours: Option<i64>,

    /// Pretty-print the JSON output
    #[arg(long = "pretty", help = "Pretty-print the JSON output")]
    pub pretty: bool,

    /// Print a per-stage summary on stderr
    #[arg(long = "stats", help = "Print a per-stage summary on stderr")]
    pub stats: bool,
}

impl AvailabilityArgs {
    /// Build the pipeline configuration from defaults and flags
    pub fn to_config(&self) -> Result<PipelineConfig> {
        let mut config = PipelineConfig::default();

        if let Some(url) = &self.feed_url {
            config = config.with_feed_url(url);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_fetch_timeout_ms(timeout_ms);
        }
        if let Some(hours) = self.max_age_hours {
            config = config.with_freshness_threshold_hours(hours);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Arguments for the details command
#[derive(Debug, Clone, Parser)]
pub struct DetailsArgs {
    /// Carpark number, e.g. ACB
    #[arg(value_name = "CODE")]
    pub code: String,

    #[arg(
        short = 'c',
        long = "catalog",
        value_name = "PATH",
        default_value = DEFAULT_CATALOG_PATH,
        help = "Path to the carpark registry CSV"
    )]
    pub catalog: PathBuf,
}

/// Arguments for the facilities command
#[derive(Debug, Clone, Parser)]
pub struct FacilitiesArgs {
    #[arg(
        short = 'c',
        long = "catalog",
        value_name = "PATH",
        default_value = DEFAULT_CATALOG_PATH,
        help = "Path to the carpark registry CSV"
    )]
    pub catalog: PathBuf,

    /// Case-insensitive address substring
    #[arg(
        short = 'a',
        long = "address",
        value_name = "PATTERN",
        help = "Only list facilities whose address contains PATTERN"
    )]
    pub address: Option<String>,

    /// Centre point for a proximity search
    #[arg(
        long = "near",
        value_name = "LAT,LON",
        requires = "radius",
        help = "Only list facilities near LAT,LON (requires --radius)"
    )]
    pub near: Option<LatLon>,

    /// Search radius in metres
    #[arg(
        long = "radius",
        value_name = "METRES",
        requires = "near",
        help = "Search radius in metres for --near"
    )]
    pub radius: Option<f64>,

    #[arg(long = "pretty", help = "Pretty-print the JSON output")]
    pub pretty: bool,
}

impl FacilitiesArgs {
    /// Validate the facilities command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(radius) = self.radius {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(Error::configuration(format!(
                    "radius must be a positive number of metres, got {}",
                    radius
                )));
            }
        }
        Ok(())
    }
}

/// A `LAT,LON` pair given on the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub GeoCoordinate);

impl FromStr for LatLon {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| format!("expected LAT,LON, got '{}'", s))?;

        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
        let longitude: f64 = lon
            .trim()
            .parse()
            .map_err(|_| format!("invalid longitude '{}'", lon.trim()))?;

        let coordinate = GeoCoordinate::new(latitude, longitude);
        if !coordinate.is_valid() {
            return Err(format!("coordinate out of range: {}", s));
        }
        Ok(Self(coordinate))
    }
}
