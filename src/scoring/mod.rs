//! Weight computation and grading
//!
//! Pure functions from parsed test records to a weights table, and
//! from a weights table plus a fresh report to a grade report. No IO
//! here; persistence lives in `crate::weights`.

use crate::models::{
    GradeError, GradeLine, GradeReport, GradeResult, TestRecord, WeightEntry, WeightsTable,
};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Build an equal-split weights table from every record seen across
/// the input reports.
///
/// Each distinct identity gets `total_score / n` points (integer
/// division); the remainder goes to the identity that sorts last, so
/// the weights always sum to exactly `total_score`.
pub fn build_weights(records: &[TestRecord], total_score: u32) -> GradeResult<WeightsTable> {
    let identities: BTreeSet<_> = records.iter().map(|r| &r.identity).collect();
    if identities.is_empty() {
        return Err(GradeError::EmptyInput);
    }

    let n = identities.len() as u32;
    let base = total_score / n;
    let remainder = total_score - base * n;

    let last = identities.len() - 1;
    let entries = identities
        .into_iter()
        .enumerate()
        .map(|(i, identity)| WeightEntry {
            identity: identity.clone(),
            weight: if i == last {
                f64::from(base + remainder)
            } else {
                f64::from(base)
            },
        })
        .collect();

    Ok(WeightsTable::new(entries))
}

/// Grade a parsed report against a weights table.
///
/// Every table entry produces one line, in table order. An identity
/// with no matching record in the report scores zero and is logged as
/// a warning; records for identities the table does not know are
/// ignored.
pub fn grade(table: &WeightsTable, records: &[TestRecord]) -> GradeReport {
    let by_identity: HashMap<_, _> = records.iter().map(|r| (&r.identity, r)).collect();

    let mut lines = Vec::with_capacity(table.len());
    let mut total_earned = 0.0;
    for entry in table.entries() {
        let record = by_identity.get(&entry.identity);
        if record.is_none() {
            warn!(test = %entry.identity, "test not found in report, scoring 0");
        }
        let passed = record.is_some_and(|r| r.outcome.passed());
        let earned = if passed { entry.weight } else { 0.0 };
        total_earned += earned;
        lines.push(GradeLine {
            identity: entry.identity.clone(),
            weight: entry.weight,
            earned,
            output: record.and_then(|r| r.output.clone()),
        });
    }

    let unknown = records
        .iter()
        .filter(|r| !table.entries().iter().any(|e| e.identity == r.identity))
        .count();
    if unknown > 0 {
        debug!(count = unknown, "report contains tests absent from the weights table");
    }

    GradeReport {
        lines,
        total_earned,
        total_possible: table.total(),
    }
}
