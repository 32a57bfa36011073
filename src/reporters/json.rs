//! Gradescope-style JSON reporter
//!
//! Emits `{"tests": [{name, score, max_score, output?}]}`, the shape
//! Gradescope's autograder harness ingests.

use crate::models::{GradeReport, TestIdentity};
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    tests: Vec<JsonTest<'a>>,
}

#[derive(Serialize)]
struct JsonTest<'a> {
    name: &'a TestIdentity,
    score: f64,
    max_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<&'a str>,
}

/// Render a grade report as a Gradescope JSON document.
pub fn render(report: &GradeReport) -> Result<String> {
    let doc = JsonReport {
        tests: report
            .lines
            .iter()
            .map(|line| JsonTest {
                name: &line.identity,
                score: line.earned,
                max_score: line.weight,
                output: line.output.as_deref().filter(|o| !o.is_empty()),
            })
            .collect(),
    };
    let mut out = serde_json::to_string_pretty(&doc)?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GradeLine;

    #[test]
    fn renders_tests_array() {
        let report = GradeReport {
            lines: vec![
                GradeLine {
                    identity: TestIdentity::from_full_name("a:one"),
                    weight: 50.0,
                    earned: 50.0,
                    output: None,
                },
                GradeLine {
                    identity: TestIdentity::from_full_name("a:two"),
                    weight: 50.0,
                    earned: 0.0,
                    output: Some("expected 3, got 4".into()),
                },
            ],
            total_earned: 50.0,
            total_possible: 100.0,
        };
        let text = render(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let tests = value["tests"].as_array().unwrap();
        assert_eq!(tests.len(), 2);
        assert_eq!(tests[0]["name"], "a:one");
        assert_eq!(tests[0]["score"], 50.0);
        assert!(tests[0].get("output").is_none());
        assert_eq!(tests[1]["score"], 0.0);
        assert_eq!(tests[1]["output"], "expected 3, got 4");
    }
}
