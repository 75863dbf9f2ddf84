//! Stale working-directory cleanup.
//!
//! Working directories are named after pull-request ids, so any top-level
//! entry (other than the `pr` staging area) that no open pull request claims
//! is left over from a closed one. Regression runs also leave large output
//! trees under a separate run root; the only index to those is the `rt_*`
//! path segments recorded in the stale directory's compile logs, so those
//! are collected and reclaimed first, then the working directory itself.
//!
//! Removal failures are logged and skipped per directory; a reap pass never
//! aborts the run.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

/// Remove working directories not owned by any open pull request.
pub fn reap_stale_dirs(workdir: &Path, run_root: Option<&Path>, open_ids: &HashSet<String>) {
    debug!("ids are: {open_ids:?}");
    let entries = match fs::read_dir(workdir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Cannot read workdir {}: {err}", workdir.display());
            return;
        }
    };
    for entry in entries.filter_map(|entry| entry.ok()) {
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == "pr" {
            continue;
        }
        debug!("Checking dir {name}");
        if open_ids.contains(&name) {
            debug!("{name} belongs to an open PR, not deleting");
            continue;
        }
        debug!("{name} is stale, deleting");
        remove_stale_dir(&entry.path(), run_root);
    }
}

fn remove_stale_dir(dir: &Path, run_root: Option<&Path>) {
    let tokens = run_dir_tokens(dir);
    if !tokens.is_empty() {
        match run_root {
            Some(root) => remove_run_dirs(root, &tokens),
            None => warn!(
                "No run root configured; leaving {} referenced run director(ies) from {}",
                tokens.len(),
                dir.display()
            ),
        }
    }
    if dir.is_dir() {
        debug!("Removing {}", dir.display());
        if let Err(err) = fs::remove_dir_all(dir) {
            warn!("Could not remove {}: {err}", dir.display());
        }
    } else {
        debug!("{} does not exist, not attempting to remove", dir.display());
    }
}

/// Collect `rt_*` path segments referenced by the compile logs under `dir`.
///
/// Lines are scanned with their terminators intact: a segment that carries
/// the line's newline is not a complete directory name and is skipped.
fn run_dir_tokens(dir: &Path) -> HashSet<String> {
    let mut tokens = HashSet::new();
    for entry in WalkDir::new(dir).into_iter().filter_map(|entry| entry.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !(name.starts_with("compile_") && name.ends_with(".log")) {
            continue;
        }
        let contents = match fs::read_to_string(entry.path()) {
            Ok(contents) => contents,
            Err(err) => {
                warn!("Cannot read {}: {err}", entry.path().display());
                continue;
            }
        };
        for line in contents.split_inclusive('\n') {
            if !line.contains("rt_") {
                continue;
            }
            for segment in line.split('/') {
                if segment.contains("rt_") && !segment.contains('\n') {
                    tokens.insert(segment.to_string());
                }
            }
        }
    }
    tokens
}

fn remove_run_dirs(run_root: &Path, tokens: &HashSet<String>) {
    for token in tokens {
        let candidate = run_root.join(token);
        if candidate.is_dir() {
            debug!("Removing run directory {}", candidate.display());
            if let Err(err) = fs::remove_dir_all(&candidate) {
                warn!("Could not remove {}: {err}", candidate.display());
            }
        } else {
            debug!(
                "{} does not exist, not attempting to remove",
                candidate.display()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn ids(values: &[&str]) -> HashSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn only_unowned_directories_are_removed() {
        let workdir = tempfile::tempdir().unwrap();
        for name in ["pr", "101", "102", "99"] {
            fs::create_dir(workdir.path().join(name)).unwrap();
        }

        reap_stale_dirs(workdir.path(), None, &ids(&["101", "102"]));

        assert!(workdir.path().join("pr").is_dir());
        assert!(workdir.path().join("101").is_dir());
        assert!(workdir.path().join("102").is_dir());
        assert!(!workdir.path().join("99").exists());
    }

    #[test]
    fn run_dirs_referenced_from_compile_logs_are_removed_too() {
        let workdir = tempfile::tempdir().unwrap();
        let run_root = tempfile::tempdir().unwrap();

        let stale = workdir.path().join("99");
        let logs = stale.join("20240101120000/ufs-weather-model/tests/logs");
        fs::create_dir_all(&logs).unwrap();
        fs::write(
            logs.join("compile_001.log"),
            "building in /scratch/FV3_RT/rt_5150/compile_001\n\
             building in /scratch/FV3_RT/rt_5150/compile_001\n\
             no run reference here\n",
        )
        .unwrap();

        fs::create_dir(run_root.path().join("rt_5150")).unwrap();
        fs::create_dir(run_root.path().join("rt_other")).unwrap();

        reap_stale_dirs(workdir.path(), Some(run_root.path()), &HashSet::new());

        assert!(!stale.exists());
        assert!(!run_root.path().join("rt_5150").exists());
        assert!(run_root.path().join("rt_other").is_dir());
    }

    #[test]
    fn segment_ending_the_line_is_not_a_run_dir_reference() {
        let workdir = tempfile::tempdir().unwrap();
        let run_root = tempfile::tempdir().unwrap();

        let stale = workdir.path().join("99");
        fs::create_dir_all(&stale).unwrap();
        fs::write(stale.join("compile_gnu.log"), "output in /scratch/rt_777\n").unwrap();

        fs::create_dir(run_root.path().join("rt_777")).unwrap();

        reap_stale_dirs(workdir.path(), Some(run_root.path()), &HashSet::new());

        assert!(!stale.exists());
        assert!(run_root.path().join("rt_777").is_dir());
    }

    #[test]
    fn stale_dir_without_compile_logs_is_still_removed() {
        let workdir = tempfile::tempdir().unwrap();
        let stale = workdir.path().join("42");
        fs::create_dir_all(stale.join("20240101120000")).unwrap();

        reap_stale_dirs(workdir.path(), None, &HashSet::new());

        assert!(!stale.exists());
    }

    #[test]
    fn missing_run_dirs_are_skipped_silently() {
        let workdir = tempfile::tempdir().unwrap();
        let run_root = tempfile::tempdir().unwrap();

        let stale = workdir.path().join("7");
        fs::create_dir_all(&stale).unwrap();
        fs::write(
            stale.join("compile_002.log"),
            "log dir /scratch/rt_1234/compile_002.log written\n",
        )
        .unwrap();

        reap_stale_dirs(workdir.path(), Some(run_root.path()), &HashSet::new());

        assert!(!stale.exists());
    }

    #[test]
    fn plain_files_at_top_level_are_left_alone() {
        let workdir = tempfile::tempdir().unwrap();
        fs::write(workdir.path().join("notes.txt"), "keep me").unwrap();

        reap_stale_dirs(workdir.path(), None, &HashSet::new());

        assert!(workdir.path().join("notes.txt").is_file());
    }
}
