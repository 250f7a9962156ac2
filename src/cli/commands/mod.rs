//! Command implementations for the carpark locator CLI
//!
//! Each command is implemented in its own module. Commands print their
//! payload on stdout and diagnostics on stderr.

pub mod availability;
pub mod details;
pub mod facilities;
pub mod shared;

pub use shared::CommandOutcome;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Main command runner
///
/// Dispatches to the subcommand handler:
/// - `availability`: one enrichment pipeline run, JSON on stdout
/// - `details`: a single registry facility
/// - `facilities`: registry listing, address search or proximity search
pub async fn run(command: Commands, args: &Args) -> Result<CommandOutcome> {
    shared::setup_logging(&args.verbosity)?;

    match command {
        Commands::Availability(availability_args) => {
            availability::run_availability(availability_args).await
        }
        Commands::Details(details_args) => details::run_details(details_args),
        Commands::Facilities(facilities_args) => facilities::run_facilities(facilities_args),
    }
}
