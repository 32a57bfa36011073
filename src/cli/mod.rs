//! CLI command definitions and handlers

mod generate;
mod grade;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::reporters::OutputFormat;

/// Parse and validate the total score (1-100000)
fn parse_max_score(s: &str) -> Result<u32, String> {
    let n: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("max score must be at least 1".to_string())
    } else if n > 100_000 {
        Err("max score cannot exceed 100000".to_string())
    } else {
        Ok(n)
    }
}

/// Testgrade - grade JUnit test reports
///
/// Build a per-test weights table from historical reports, then grade
/// fresh reports against it.
#[derive(Parser, Debug)]
#[command(name = "testgrade")]
#[command(
    version,
    about = "Grade JUnit XML test reports against a persisted per-test weights table",
    long_about = "Testgrade splits a total score evenly across every distinct test case \
seen in one or more JUnit XML reports and persists the result as a CSV weights table.\n\n\
A later run grades a fresh report against that table: each test earns its full weight \
when it passed and zero otherwise.",
    after_help = "\
Examples:
  testgrade generate results.xml               Build scores.csv from one report
  testgrade generate run1.xml run2.xml         Aggregate identities across runs
  testgrade generate -m 50 results.xml         Split 50 points instead of 100
  testgrade grade results.xml                  Print per-test scores and the total
  testgrade grade results.xml --format json    Gradescope-style JSON output
  testgrade grade-txt results.xml              Plain-text grading (same as grade)"
)]
pub struct Cli {
    /// Path to the weights table CSV
    #[arg(long, short = 's', global = true, default_value = "scores.csv")]
    pub scores_csv: PathBuf,

    /// Total score distributed across all tests (must match at generate and grade time)
    #[arg(long, short = 'm', global = true, default_value = "100", value_parser = parse_max_score)]
    pub max_score: u32,

    /// Seconds of runtime after which a silent failure is flagged as a probable timeout
    #[arg(long, short = 't', global = true, default_value = "10")]
    pub timeout: f64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the weights table from one or more JUnit XML reports
    Generate {
        /// JUnit XML report files
        #[arg(required = true)]
        xml_files: Vec<PathBuf>,
    },

    /// Grade one JUnit XML report against the weights table
    Grade {
        /// JUnit XML report file
        xml_file: PathBuf,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Grade with plain-text output (shorthand for `grade --format text`)
    GradeTxt {
        /// JUnit XML report file
        xml_file: PathBuf,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Generate { xml_files } => {
            generate::run(xml_files, &cli.scores_csv, cli.max_score, cli.timeout)
        }
        Commands::Grade { xml_file, format } => {
            let format: OutputFormat = format.parse()?;
            grade::run(xml_file, &cli.scores_csv, cli.max_score, cli.timeout, format)
        }
        Commands::GradeTxt { xml_file } => grade::run(
            xml_file,
            &cli.scores_csv,
            cli.max_score,
            cli.timeout,
            OutputFormat::Text,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_score_bounds() {
        assert_eq!(parse_max_score("100"), Ok(100));
        assert!(parse_max_score("0").is_err());
        assert!(parse_max_score("abc").is_err());
        assert!(parse_max_score("100001").is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
