//! Shared components for CLI commands

use crate::app::services::facility_catalog::FacilityCatalog;
use crate::cli::args::Verbosity;
use crate::{Error, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// How a command finished, mapped to the process exit status by `main`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Completed,
    /// The requested item does not exist
    NotFound,
}

impl CommandOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Completed => 0,
            Self::NotFound => 2,
        }
    }
}

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over the verbosity flags.
pub fn setup_logging(verbosity: &Verbosity) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = verbosity.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("carpark_locator={}", log_level)));

    let result = if verbosity.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| Error::configuration(format!("failed to initialise logging: {e}")))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load the registry for commands that only query the catalog
///
/// An unavailable registry degrades to an empty catalog, so lookups report
/// "not found" instead of failing the command.
pub fn load_catalog(path: &Path) -> FacilityCatalog {
    let catalog = FacilityCatalog::load_or_empty(path);
    let metadata = catalog.metadata();
    debug!(
        "Catalog {} holds {} facilities (loaded {:.3}s ago)",
        metadata.source_name,
        metadata.facility_count,
        metadata.age().as_secs_f64()
    );
    catalog
}

/// Serialize `value` as JSON onto stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, value, pretty)
}

/// Serialize `value` as JSON followed by a newline
pub fn write_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, value)?;
    } else {
        serde_json::to_writer(&mut *writer, value)?;
    }
    writeln!(writer).map_err(serde_json::Error::io)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::GeoCoordinate;

    #[test]
    fn test_write_json_compact_and_pretty() {
        let coordinate = GeoCoordinate::new(1.3, 103.8);

        let mut compact = Vec::new();
        write_json(&mut compact, &coordinate, false).unwrap();
        assert_eq!(
            String::from_utf8(compact).unwrap(),
            "{\"latitude\":1.3,\"longitude\":103.8}\n"
        );

        let mut pretty = Vec::new();
        write_json(&mut pretty, &coordinate, true).unwrap();
        let text = String::from_utf8(pretty).unwrap();
        assert!(text.contains("\n  \"latitude\": 1.3"));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CommandOutcome::Completed.exit_code(), 0);
        assert_eq!(CommandOutcome::NotFound.exit_code(), 2);
    }

    #[test]
    fn test_load_catalog_missing_file_degrades_to_empty() {
        let catalog = load_catalog(Path::new("/definitely/not/here.csv"));

        assert!(catalog.is_empty());
        assert!(catalog.lookup("ACB").is_none());
        assert_eq!(catalog.metadata().source_name, "/definitely/not/here.csv");
    }

    #[test]
    fn test_load_catalog_corrupt_file_degrades_to_empty() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("registry.csv");
        std::fs::write(&path, "car_park_no,address\nACB,ALBERT CENTRE\n").unwrap();

        assert!(load_catalog(&path).is_empty());
    }
}
