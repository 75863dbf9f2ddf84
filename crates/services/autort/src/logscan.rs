//! Regression-test log inspection.
//!
//! The test driver's log is the only authoritative record of whether a run
//! passed. Three line markers form the wire contract and must be preserved
//! byte-for-byte: a failed test prints a line containing both `Test` and
//! `failed`, the run directory appears on the first line containing
//! `working dir`, and a completed run prints a line containing `SUCCESSFUL`.
//!
//! A log that ends without the `SUCCESSFUL` marker is an incomplete run, no
//! matter how many failure lines it contains; a missing file means the driver
//! never got far enough to write one.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::info;

/// Terminal classification of one log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The log file does not exist.
    Missing,
    /// The log exists but ended without the terminal success marker.
    Incomplete,
    /// The terminal success marker was seen.
    Success {
        /// Parent directory of the last token on the first `working dir`
        /// line, when one was seen before the success marker.
        run_dir: Option<PathBuf>,
    },
}

/// Result of scanning one log file.
///
/// Failure lines are collected alongside the verdict: a successful run can
/// still carry failed-test lines, and they are reported either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogScan {
    /// Lines matching the failure pattern, verbatim, in file order.
    pub failures: Vec<String>,
    pub verdict: Verdict,
}

/// Scan a regression-test log file.
///
/// Lines are visited in file order. Failure lines accumulate until the
/// success marker terminates the scan; the first `working dir` line wins.
/// Inspection does not modify the file, so repeated calls agree.
pub fn inspect(path: &Path) -> std::io::Result<LogScan> {
    if !path.exists() {
        return Ok(LogScan {
            failures: Vec::new(),
            verdict: Verdict::Missing,
        });
    }

    let mut failures = Vec::new();
    let mut run_dir: Option<PathBuf> = None;

    let reader = BufReader::new(File::open(path)?);
    for line in reader.lines() {
        let line = line?;
        if line.contains("Test") && line.contains("failed") {
            failures.push(line);
        } else if line.contains("working dir") && run_dir.is_none() {
            info!("Found \"working dir\" in line: {line}");
            run_dir = line
                .split_whitespace()
                .last()
                .and_then(|token| Path::new(token).parent())
                .map(Path::to_path_buf);
        } else if line.contains("SUCCESSFUL") {
            info!("Regression test successful");
            return Ok(LogScan {
                failures,
                verdict: Verdict::Success { run_dir },
            });
        }
    }

    Ok(LogScan {
        failures,
        verdict: Verdict::Incomplete,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_log(lines: &[&str]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("RegressionTests_hera.log");
        fs::write(&path, lines.join("\n")).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let scan = inspect(&dir.path().join("nope.log")).unwrap();
        assert_eq!(scan.verdict, Verdict::Missing);
        assert!(scan.failures.is_empty());
    }

    #[test]
    fn no_terminal_marker_means_incomplete() {
        let (_dir, path) = write_log(&[
            "Start Regression test",
            "Test 001 control_p8 failed in run_test",
            "Test 002 regional_control failed in check_result",
        ]);
        let scan = inspect(&path).unwrap();
        assert_eq!(scan.verdict, Verdict::Incomplete);
        assert_eq!(scan.failures.len(), 2);
    }

    #[test]
    fn success_keeps_previously_collected_failures() {
        let (_dir, path) = write_log(&[
            "Test 001 control_p8 failed in run_test",
            "REGRESSION TEST WAS SUCCESSFUL",
        ]);
        let scan = inspect(&path).unwrap();
        assert!(matches!(scan.verdict, Verdict::Success { .. }));
        assert_eq!(
            scan.failures,
            vec!["Test 001 control_p8 failed in run_test".to_string()]
        );
    }

    #[test]
    fn success_captures_run_dir_parent() {
        let (_dir, path) = write_log(&[
            "working dir = /stmp/emc.nemspara/FV3_RT/rt_12345/control_p8",
            "REGRESSION TEST WAS SUCCESSFUL",
        ]);
        let scan = inspect(&path).unwrap();
        assert_eq!(
            scan.verdict,
            Verdict::Success {
                run_dir: Some(PathBuf::from("/stmp/emc.nemspara/FV3_RT/rt_12345"))
            }
        );
    }

    #[test]
    fn first_working_dir_line_wins() {
        let (_dir, path) = write_log(&[
            "working dir = /first/rt_1/test_a",
            "working dir = /second/rt_2/test_b",
            "REGRESSION TEST WAS SUCCESSFUL",
        ]);
        let scan = inspect(&path).unwrap();
        assert_eq!(
            scan.verdict,
            Verdict::Success {
                run_dir: Some(PathBuf::from("/first/rt_1"))
            }
        );
    }

    #[test]
    fn lines_after_success_marker_are_ignored() {
        let (_dir, path) = write_log(&[
            "REGRESSION TEST WAS SUCCESSFUL",
            "Test 009 late failed in run_test",
        ]);
        let scan = inspect(&path).unwrap();
        assert!(matches!(scan.verdict, Verdict::Success { .. }));
        assert!(scan.failures.is_empty());
    }

    #[test]
    fn failure_needs_both_substrings() {
        let (_dir, path) = write_log(&[
            "Test 001 control_p8 passed",
            "compile job failed",
            "the test FAILED earlier",
        ]);
        let scan = inspect(&path).unwrap();
        assert!(scan.failures.is_empty());
        assert_eq!(scan.verdict, Verdict::Incomplete);
    }

    #[test]
    fn inspection_is_idempotent() {
        let (_dir, path) = write_log(&[
            "Test 004 cpld_control failed in run_test",
            "working dir = /stmp/rt_9/cpld_control",
            "REGRESSION TEST WAS SUCCESSFUL",
        ]);
        let first = inspect(&path).unwrap();
        let second = inspect(&path).unwrap();
        assert_eq!(first, second);
    }
}
