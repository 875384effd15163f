//! CLI entry point for greedy wall synthesis

use clap::Parser;
use greedywall::io::cli::{Cli, FileProcessor};
use tracing_subscriber::EnvFilter;

fn main() -> greedywall::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut processor = FileProcessor::new(cli);
    processor.process()
}
