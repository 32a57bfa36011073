//! Plain-text (terminal) reporter

use crate::models::{format_points, GradeReport};
use anyhow::Result;

const SEPARATOR: &str = "--------------------------";

/// Render a grade report as per-test score lines and a total.
pub fn render(report: &GradeReport) -> Result<String> {
    let mut out = String::new();

    for line in &report.lines {
        out.push_str(&format!(
            "{}: {}/{}\n",
            line.identity,
            format_points(line.earned),
            format_points(line.weight)
        ));
    }

    out.push_str(SEPARATOR);
    out.push('\n');
    out.push_str(&format!(
        "{} / {}\n",
        format_points(report.total_earned),
        format_points(report.total_possible)
    ));

    Ok(out)
}
