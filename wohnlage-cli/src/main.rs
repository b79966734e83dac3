//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;
use wohnlage_cli::CliError;

fn main() {
    init_logging();
    match wohnlage_cli::run() {
        Ok(()) => {}
        // clap renders help, version and usage errors with its own exit codes.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("wohnlage: {err}");
            std::process::exit(1);
        }
    }
}

/// Send log records to stderr, filtered by `RUST_LOG` (default `info`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("wohnlage: failed to initialise logging: {err}");
    }
}
