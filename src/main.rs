use carpark_locator::cli::{args::Args, commands};
use clap::{CommandFactory, Parser};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help
    let Some(command) = args.command.clone() else {
        let _ = Args::command().print_help();
        process::exit(0);
    };

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(command, &args) => result,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down");
                process::exit(130);
            }
        }
    });

    match result {
        Ok(outcome) => process::exit(outcome.exit_code()),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
