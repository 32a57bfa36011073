//! CLI flag contract tests
//!
//! Verifies that --scores-csv, --max-score, and --timeout behave the
//! same way across generate and grade runs.

use std::path::Path;
use std::process::Command;

fn testgrade_bin() -> String {
    env!("CARGO_BIN_EXE_testgrade").to_string()
}

fn run_in(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(testgrade_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run testgrade");
    (
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
        output.status.code().unwrap_or(-1),
    )
}

/// Write a small pytest-style report with three passing tests.
fn setup_report(dir: &Path) -> String {
    let report = dir.join("results.xml");
    std::fs::write(
        &report,
        r#"<?xml version="1.0" encoding="utf-8"?>
<testsuite name="pytest" tests="3" time="0.031">
  <testcase classname="test_library" name="test_one" time="0.001"/>
  <testcase classname="test_library" name="test_two" time="0.001"/>
  <testcase classname="test_library" name="test_three" time="0.001"/>
</testsuite>
"#,
    )
    .unwrap();
    report.to_str().unwrap().to_string()
}

#[test]
fn scores_csv_flag_relocates_the_table() {
    let dir = tempfile::tempdir().unwrap();
    let report = setup_report(dir.path());

    let (_, stderr, code) = run_in(
        dir.path(),
        &["generate", "-s", "weights/table.csv", &report],
    );
    // Parent directory does not exist; generate must fail cleanly.
    assert_ne!(code, 0, "expected failure, got: {stderr}");

    std::fs::create_dir(dir.path().join("weights")).unwrap();
    let (_, stderr, code) = run_in(
        dir.path(),
        &["generate", "-s", "weights/table.csv", &report],
    );
    assert_eq!(code, 0, "generate failed: {stderr}");
    assert!(dir.path().join("weights/table.csv").exists());
    assert!(!dir.path().join("scores.csv").exists());

    let (stdout, _, code) = run_in(dir.path(), &["grade", "-s", "weights/table.csv", &report]);
    assert_eq!(code, 0);
    assert!(stdout.ends_with("100 / 100\n"));
}

#[test]
fn max_score_flag_changes_the_split_and_keeps_the_sum_exact() {
    let dir = tempfile::tempdir().unwrap();
    let report = setup_report(dir.path());

    let (_, stderr, code) = run_in(dir.path(), &["generate", "-m", "50", &report]);
    assert_eq!(code, 0, "generate failed: {stderr}");

    // 50 points over 3 tests: 16 + 16 + 18, remainder on the last row.
    let csv = std::fs::read_to_string(dir.path().join("scores.csv")).unwrap();
    assert_eq!(
        csv,
        "identity,weight\n\
         test_library:test_one,16\n\
         test_library:test_three,16\n\
         test_library:test_two,18\n"
    );

    let (stdout, _, code) = run_in(dir.path(), &["grade", "-m", "50", &report]);
    assert_eq!(code, 0);
    assert!(stdout.ends_with("50 / 50\n"));
}

#[test]
fn max_score_mismatch_at_grade_time_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let report = setup_report(dir.path());

    let (_, _, code) = run_in(dir.path(), &["generate", "-m", "50", &report]);
    assert_eq!(code, 0);

    // Default total is 100; the stored table sums to 50.
    let (stdout, stderr, code) = run_in(dir.path(), &["grade", &report]);
    assert_ne!(code, 0);
    assert_eq!(stdout, "");
    assert!(stderr.contains("50"));
}

#[test]
fn timeout_flag_annotates_silent_slow_failures() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("slow.xml");
    std::fs::write(
        &report,
        r#"<testsuite name="pytest" tests="1">
  <testcase classname="test_library" name="test_slow" time="3.2">
    <failure/>
  </testcase>
</testsuite>
"#,
    )
    .unwrap();
    let report = report.to_str().unwrap();

    let (_, _, code) = run_in(dir.path(), &["generate", report]);
    assert_eq!(code, 0);

    // With the default 10s timeout the failure has no output.
    let (stdout, _, _) = run_in(dir.path(), &["grade", report, "--format", "json"]);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(value["tests"][0].get("output").is_none());

    // Dropping the timeout below the testcase runtime flags it.
    let (stdout, _, _) = run_in(
        dir.path(),
        &["grade", "-t", "2", report, "--format", "json"],
    );
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["tests"][0]["output"], "TIMEOUT (infinite loop?)");
}

#[test]
fn invalid_max_score_is_rejected_by_clap() {
    let dir = tempfile::tempdir().unwrap();
    let report = setup_report(dir.path());
    let (_, stderr, code) = run_in(dir.path(), &["generate", "-m", "0", &report]);
    assert_ne!(code, 0);
    assert!(stderr.contains("max score"));
}
