//! JUnit XML report parser
//!
//! Extracts one `TestRecord` per `<testcase>` element, however deeply
//! the element is nested under `<testsuite>` wrappers. Outcomes come
//! from explicit child-element checks (`<failure>`, `<error>`,
//! `<skipped>`); emitters that use a `status` attribute instead of
//! child elements are also handled.

use crate::models::{GradeError, GradeResult, Outcome, TestIdentity, TestRecord};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;
use tracing::debug;

/// Failure message used when a failed testcase has no captured output
/// but its runtime exceeded the timeout.
const TIMEOUT_NOTE: &str = "TIMEOUT (infinite loop?)";

/// Parse a JUnit XML file into an ordered sequence of test records.
///
/// `timeout_secs` controls when a silent failure is annotated as a
/// probable timeout based on the testcase's `time` attribute.
pub fn parse_report(path: &Path, timeout_secs: f64) -> GradeResult<Vec<TestRecord>> {
    let xml = std::fs::read_to_string(path).map_err(|e| GradeError::Parse {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let records = parse_str(&xml, path, timeout_secs)?;
    debug!(
        file = %path.display(),
        records = records.len(),
        "parsed JUnit report"
    );
    Ok(records)
}

fn parse_err(file: &Path, e: impl std::fmt::Display) -> GradeError {
    GradeError::Parse {
        file: file.to_path_buf(),
        reason: e.to_string(),
    }
}

fn parse_str(xml: &str, file: &Path, timeout_secs: f64) -> GradeResult<Vec<TestRecord>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    loop {
        match reader.read_event().map_err(|e| parse_err(file, e))? {
            Event::Start(e) if e.name().as_ref() == b"testcase" => {
                records.push(read_testcase(&mut reader, &e, file, timeout_secs, false)?);
            }
            Event::Empty(e) if e.name().as_ref() == b"testcase" => {
                records.push(read_testcase(&mut reader, &e, file, timeout_secs, true)?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if records.is_empty() {
        return Err(parse_err(file, "no testcase elements found"));
    }
    Ok(records)
}

/// Which child element text is currently being read.
#[derive(Clone, Copy, PartialEq)]
enum Child {
    None,
    Failure,
    SystemOut,
}

fn read_testcase(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    file: &Path,
    timeout_secs: f64,
    empty: bool,
) -> GradeResult<TestRecord> {
    let classname = attr(start, "classname").ok_or_else(|| GradeError::Structure {
        file: file.to_path_buf(),
        reason: "testcase element is missing the classname attribute".into(),
    })?;
    let name = attr(start, "name").ok_or_else(|| GradeError::Structure {
        file: file.to_path_buf(),
        reason: format!("testcase in class '{classname}' is missing the name attribute"),
    })?;
    let status = attr(start, "status");
    let time: Option<f64> = attr(start, "time").and_then(|t| t.parse().ok());

    let mut failed = false;
    let mut errored = false;
    let mut skipped = false;
    let mut failure_text: Option<String> = None;
    let mut system_out: Option<String> = None;

    if !empty {
        let mut child = Child::None;
        loop {
            match reader.read_event().map_err(|e| parse_err(file, e))? {
                Event::Start(e) => {
                    child = match e.name().as_ref() {
                        b"failure" => {
                            failed = true;
                            Child::Failure
                        }
                        b"error" => {
                            errored = true;
                            Child::Failure
                        }
                        b"skipped" => {
                            skipped = true;
                            Child::None
                        }
                        b"system-out" => Child::SystemOut,
                        _ => Child::None,
                    };
                }
                Event::Empty(e) => match e.name().as_ref() {
                    b"failure" => failed = true,
                    b"error" => errored = true,
                    b"skipped" => skipped = true,
                    _ => {}
                },
                Event::End(e) if e.name().as_ref() == b"testcase" => break,
                Event::End(_) => child = Child::None,
                Event::Text(t) => {
                    let text = t
                        .unescape()
                        .map_err(|e| parse_err(file, e))?
                        .trim()
                        .to_string();
                    capture(child, text, &mut failure_text, &mut system_out);
                }
                Event::CData(t) => {
                    let text = String::from_utf8_lossy(&t).trim().to_string();
                    capture(child, text, &mut failure_text, &mut system_out);
                }
                Event::Eof => {
                    return Err(parse_err(file, "unexpected end of file inside a testcase"));
                }
                _ => {}
            }
        }
    }

    // Precedence: explicit child elements, then the status attribute,
    // then passed by default.
    let outcome = if failed {
        Outcome::Failed
    } else if errored {
        Outcome::Errored
    } else if skipped {
        Outcome::Skipped
    } else {
        match status.as_deref() {
            None | Some("run") => Outcome::Passed,
            Some(_) => Outcome::Failed,
        }
    };

    let output = if outcome.passed() || outcome == Outcome::Skipped {
        None
    } else {
        failure_text
            .filter(|t| !t.is_empty())
            .or(system_out.filter(|t| !t.is_empty()))
            .or_else(|| {
                time.filter(|t| *t > timeout_secs)
                    .map(|_| TIMEOUT_NOTE.to_string())
            })
    };

    Ok(TestRecord {
        identity: TestIdentity::new(&classname, &name),
        outcome,
        output,
    })
}

fn capture(
    child: Child,
    text: String,
    failure_text: &mut Option<String>,
    system_out: &mut Option<String>,
) {
    match child {
        Child::Failure if failure_text.is_none() => *failure_text = Some(text),
        Child::SystemOut if system_out.is_none() => *system_out = Some(text),
        _ => {}
    }
}

fn attr(e: &BytesStart<'_>, name: &str) -> Option<String> {
    e.try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}
