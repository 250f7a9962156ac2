//! Details command implementation

use super::shared::{CommandOutcome, load_catalog, print_json};
use crate::cli::args::DetailsArgs;
use crate::Result;
use tracing::{debug, info};

/// Print one facility, or report it missing with a distinct exit status
pub fn run_details(args: DetailsArgs) -> Result<CommandOutcome> {
    debug!("Details arguments: {:?}", args);

    let catalog = load_catalog(&args.catalog);

    match catalog.lookup(args.code.trim()) {
        Some(facility) => {
            info!("Found carpark {}", facility.car_park_no);
            print_json(facility, true)?;
            Ok(CommandOutcome::Completed)
        }
        None => {
            eprintln!("Carpark not found: {}", args.code);
            Ok(CommandOutcome::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn details_args(code: &str, catalog: PathBuf) -> DetailsArgs {
        DetailsArgs {
            code: code.to_string(),
            catalog,
        }
    }

    #[test]
    fn test_missing_registry_reports_not_found() {
        let args = details_args("ACB", PathBuf::from("/definitely/not/here.csv"));
        assert_eq!(run_details(args).unwrap(), CommandOutcome::NotFound);
    }

    #[test]
    fn test_known_and_unknown_codes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("registry.csv");
        std::fs::write(
            &path,
            "car_park_no,address,x_coord,y_coord\nACB,BLK 270/271 ALBERT CENTRE,30314.7936,31490.4942\n",
        )
        .unwrap();

        assert_eq!(
            run_details(details_args(" ACB ", path.clone())).unwrap(),
            CommandOutcome::Completed
        );
        assert_eq!(
            run_details(details_args("ZZ9", path)).unwrap(),
            CommandOutcome::NotFound
        );
    }
}
