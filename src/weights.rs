//! Weights table persistence
//!
//! The table is stored as CSV with an `identity,weight` header, one
//! row per test identity, sorted by identity. The whole file is
//! serialized in memory and written in a single call, so a failed
//! generate never leaves a partial table behind.

use crate::models::{
    format_points, GradeError, GradeResult, TestIdentity, WeightEntry, WeightsTable,
};
use std::path::Path;
use tracing::debug;

/// Accepted drift between the stored weight sum and the configured
/// total score when loading.
const SUM_TOLERANCE: f64 = 1e-6;

/// Serialize a weights table to CSV bytes.
pub fn to_csv(table: &WeightsTable) -> GradeResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["identity", "weight"])
        .map_err(|e| write_error(e))?;
    for entry in table.entries() {
        writer
            .write_record([entry.identity.as_str(), format_points(entry.weight).as_str()])
            .map_err(|e| write_error(e))?;
    }
    writer.into_inner().map_err(|e| write_error(e.error()))
}

fn write_error(e: impl std::fmt::Display) -> GradeError {
    GradeError::MissingWeights {
        file: "<in-memory>".into(),
        reason: format!("CSV serialization failed: {e}"),
    }
}

/// Write a weights table to `path` in one shot.
pub fn save(table: &WeightsTable, path: &Path) -> GradeResult<()> {
    let bytes = to_csv(table)?;
    std::fs::write(path, bytes).map_err(|e| GradeError::MissingWeights {
        file: path.to_path_buf(),
        reason: format!("failed to write: {e}"),
    })?;
    debug!(file = %path.display(), rows = table.len(), "wrote weights table");
    Ok(())
}

/// Load and validate a weights table.
///
/// The header row is optional. The table is rejected when it has no
/// rows, a malformed or negative weight, or a weight sum that differs
/// from `expected_total` beyond tolerance.
pub fn load(path: &Path, expected_total: u32) -> GradeResult<WeightsTable> {
    let invalid = |reason: String| GradeError::MissingWeights {
        file: path.to_path_buf(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| invalid(e.to_string()))?;

    let mut entries = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| invalid(format!("CSV parse error at row {idx}: {e}")))?;
        let identity = record
            .get(0)
            .ok_or_else(|| invalid(format!("missing identity at row {idx}")))?;
        let weight_field = record
            .get(1)
            .ok_or_else(|| invalid(format!("missing weight for '{identity}' at row {idx}")))?;

        // Optional header row.
        if idx == 0 && identity == "identity" && weight_field == "weight" {
            continue;
        }

        let weight: f64 = weight_field
            .trim()
            .parse()
            .map_err(|_| invalid(format!("malformed weight '{weight_field}' at row {idx}")))?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(invalid(format!("weight {weight} at row {idx} is not a valid point value")));
        }

        entries.push(WeightEntry {
            identity: TestIdentity::from_full_name(identity),
            weight,
        });
    }

    if entries.is_empty() {
        return Err(invalid("no weight rows found".into()));
    }

    let table = WeightsTable::new(entries);
    let total = table.total();
    if (total - f64::from(expected_total)).abs() > SUM_TOLERANCE {
        return Err(invalid(format!(
            "weights sum to {total} but the configured total score is {expected_total}"
        )));
    }

    debug!(file = %path.display(), rows = table.len(), "loaded weights table");
    Ok(table)
}
