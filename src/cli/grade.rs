//! Grade command - score one report against the weights table

use anyhow::Result;
use std::path::Path;

use crate::parsers::junit;
use crate::reporters::{self, OutputFormat};
use crate::scoring;
use crate::weights;

/// Run the grade command
pub fn run(
    xml_file: &Path,
    scores_csv: &Path,
    max_score: u32,
    timeout: f64,
    format: OutputFormat,
) -> Result<()> {
    let table = weights::load(scores_csv, max_score)?;
    let records = junit::parse_report(xml_file, timeout)?;
    let report = scoring::grade(&table, &records);

    // Render the whole report before printing any of it.
    let rendered = reporters::render(&report, format)?;
    print!("{rendered}");
    Ok(())
}
