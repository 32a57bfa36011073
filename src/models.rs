//! Core data models for Testgrade
//!
//! These models are shared by the parser, the weights builder, and the
//! grader: test identities, per-run outcomes, the persisted weights
//! table, and the grade report built from them.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Composite key uniquely naming a test case across runs, rendered as
/// `<classname>:<testname>`.
///
/// This is the join key between a weights table and a graded report,
/// and the sort key for all persisted and printed output. It must be
/// stable across runs of the same suite for weighting to be meaningful.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TestIdentity(String);

impl TestIdentity {
    pub fn new(classname: &str, testname: &str) -> Self {
        Self(format!("{classname}:{testname}"))
    }

    /// Build from an already rendered `classname:testname` string.
    pub fn from_full_name(full_name: impl Into<String>) -> Self {
        Self(full_name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TestIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a single testcase element.
///
/// Classified from explicit element-presence checks on the testcase's
/// children (or its `status` attribute). Everything except `Passed`
/// earns zero points when graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
    Errored,
    Skipped,
}

impl Outcome {
    pub fn passed(self) -> bool {
        matches!(self, Outcome::Passed)
    }
}

/// One observed outcome for a test identity within a single parsed report.
#[derive(Debug, Clone)]
pub struct TestRecord {
    pub identity: TestIdentity,
    pub outcome: Outcome,
    /// Captured failure output: `<failure>` text, falling back to
    /// `<system-out>`, falling back to a timeout note.
    pub output: Option<String>,
}

/// One row of the weights table.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightEntry {
    pub identity: TestIdentity,
    pub weight: f64,
}

/// Mapping from test identity to point weight.
///
/// Entries are kept sorted by identity so serialization and grading
/// output are deterministic. Invariant: weights sum to the configured
/// total score and every weight is non-negative.
#[derive(Debug, Clone, Default)]
pub struct WeightsTable {
    entries: Vec<WeightEntry>,
}

impl WeightsTable {
    pub fn new(mut entries: Vec<WeightEntry>) -> Self {
        entries.sort_by(|a, b| a.identity.cmp(&b.identity));
        Self { entries }
    }

    pub fn entries(&self) -> &[WeightEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Sum of all weights (the total possible score).
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }
}

/// Score earned by one weights-table row in a graded report.
#[derive(Debug, Clone)]
pub struct GradeLine {
    pub identity: TestIdentity,
    pub weight: f64,
    pub earned: f64,
    pub output: Option<String>,
}

/// Result of grading a single report against a weights table.
///
/// Lines follow the weights table's identity order. Built fresh per
/// invocation and only ever rendered, never persisted.
#[derive(Debug, Clone)]
pub struct GradeReport {
    pub lines: Vec<GradeLine>,
    pub total_earned: f64,
    pub total_possible: f64,
}

/// Render a point value without a trailing `.0` when it is whole.
pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{points:.0}")
    } else {
        format!("{points}")
    }
}

/// Errors from parsing reports, building weights, and grading.
#[derive(Error, Debug)]
pub enum GradeError {
    #[error("failed to parse {}: {reason}", file.display())]
    Parse { file: PathBuf, reason: String },

    #[error("malformed testcase in {}: {reason}", file.display())]
    Structure { file: PathBuf, reason: String },

    #[error("no test records found in the input files")]
    EmptyInput,

    #[error("weights table {} is missing or invalid: {reason}", file.display())]
    MissingWeights { file: PathBuf, reason: String },
}

pub type GradeResult<T> = Result<T, GradeError>;
