//! Generate command - build the weights table from historical reports

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::parsers::junit;
use crate::scoring;
use crate::weights;

/// Run the generate command
pub fn run(xml_files: &[PathBuf], scores_csv: &Path, max_score: u32, timeout: f64) -> Result<()> {
    let mut records = Vec::new();
    for file in xml_files {
        records.extend(junit::parse_report(file, timeout)?);
    }

    // The table is fully computed before anything touches the disk, so
    // a parse failure never leaves a partial CSV behind.
    let table = scoring::build_weights(&records, max_score)?;
    weights::save(&table, scores_csv)?;

    info!(
        file = %scores_csv.display(),
        tests = table.len(),
        total = max_score,
        "weights table written"
    );
    println!(
        "Wrote {} ({} tests, {} points total)",
        scores_csv.display(),
        table.len(),
        max_score
    );
    Ok(())
}
