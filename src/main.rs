//! Testgrade - JUnit report grading CLI
//!
//! Turns one or more JUnit XML test reports into a per-test weights
//! table (CSV), then grades fresh reports against that table.

mod cli;
mod models;
mod parsers;
mod reporters;
mod scoring;
mod weights;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // Parse CLI args and run
    let cli = cli::Cli::parse();
    cli::run(cli)
}
