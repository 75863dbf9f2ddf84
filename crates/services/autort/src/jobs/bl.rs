//! Baseline creation workflow.
//!
//! Creating a baseline is a regression run that also publishes its freshly
//! generated data set into the shared baseline store. The target directory is
//! derived from the `BL_DATE` recorded in the pull request's checkout, and
//! must not exist beforehand: a pre-existing target always means another run
//! got there first, and the workflow aborts rather than touch it. After a
//! successful move the job chains straight into a standard regression run
//! against the data it just published.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use autort_config::settings::Settings;

use crate::job::Job;
use crate::jobs::{self, clone_pr_repo, driver_command, record_failures, regression_log, run_command};
use crate::logscan::{self, Verdict};
use crate::prelude::*;
use crate::report::Report;

/// Name of the file recording the expected baseline date, relative to the
/// checkout's `tests/` directory.
const BL_DATE_FILE: &str = "bl_date.conf";

/// Run the baseline workflow end to end.
pub async fn run(settings: &Settings, job: &Job, report: &mut Report) -> Result<()> {
    let baseline_store = settings
        .baseline_store
        .clone()
        .ok_or(autort_config::error::Error::MissingArgument("baseline"))?;
    let new_baseline = settings
        .new_baseline_for(job.compiler.as_str())
        .ok_or(autort_config::error::Error::MissingArgument("new_baseline"))?;
    info!("blstore: {}", baseline_store.display());
    info!("new baseline staging: {}", new_baseline.display());

    let checkout = clone_pr_repo(settings, job, report, "BL").await?;

    let bl_date = read_baseline_date(&checkout.repo_dir, report)?;
    let bl_dir = baseline_store
        .join(format!("main-{bl_date}"))
        .join(job.compiler.upper());

    ensure_baseline_absent(&bl_dir, report)?;

    run_command(driver_command(settings, job, &checkout.repo_dir, true)).await?;

    let log = regression_log(&checkout.repo_dir, &settings.machine);
    let scan = logscan::inspect(&log)?;
    record_failures(&scan, "BL", report);

    match scan.verdict {
        Verdict::Missing => {
            report.push(format!("[BL] ERROR: could not find log {}", log.display()));
            Err(Error::LogMissing(log))
        }
        Verdict::Incomplete => Err(Error::LogIncomplete),
        Verdict::Success { .. } => {
            create_baseline_dir(&bl_dir, report)?;
            move_baseline_contents(&new_baseline, &bl_dir)?;
            report.push("[BL] Baseline creation and move successful");
            info!("Baseline published to {}", bl_dir.display());

            info!("Starting chained regression run");
            jobs::rt::run(settings, job, report).await
        }
    }
}

/// Read and validate the `BL_DATE=` entry in the checkout's date file.
fn read_baseline_date(repo_dir: &Path, report: &mut Report) -> Result<String> {
    let path = repo_dir.join("tests").join(BL_DATE_FILE);
    let contents = fs::read_to_string(&path)?;
    for line in contents.lines() {
        if !line.contains("BL_DATE=") {
            continue;
        }
        let value = line
            .split('=')
            .nth(1)
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        info!("BL_DATE is {value:?}");
        validate_baseline_date(&value)?;
        return Ok(value);
    }
    report.push(format!(
        "[BL] ERROR: Variable \"BL_DATE\" not found in tests/{BL_DATE_FILE}."
    ));
    Err(Error::BaselineDateMissing(path))
}

/// A baseline date is exactly eight digits forming a real `YYYYMMDD` date.
fn validate_baseline_date(value: &str) -> Result<()> {
    let well_formed = value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit());
    if !well_formed || NaiveDate::parse_from_str(value, "%Y%m%d").is_err() {
        return Err(Error::InvalidDateFormat(value.to_string()));
    }
    Ok(())
}

/// Hard precondition: the target baseline directory must not exist yet.
fn ensure_baseline_absent(bl_dir: &Path, report: &mut Report) -> Result<()> {
    info!("Checking that {} does not exist yet", bl_dir.display());
    if bl_dir.exists() {
        report.push(format!(
            "[BL] ERROR: Baseline location exists before creation:\n{}",
            bl_dir.display()
        ));
        return Err(Error::BaselineAlreadyExists(bl_dir.to_path_buf()));
    }
    Ok(())
}

/// Create the target directory, re-checking absence against a concurrent run.
fn create_baseline_dir(bl_dir: &Path, report: &mut Report) -> Result<()> {
    ensure_baseline_absent(bl_dir, report)?;
    fs::create_dir_all(bl_dir)?;
    if !bl_dir.exists() {
        return Err(Error::BaselineCreateFailed(bl_dir.to_path_buf()));
    }
    Ok(())
}

/// Move every entry of the staging directory into the target.
fn move_baseline_contents(new_baseline: &Path, bl_dir: &Path) -> Result<()> {
    for entry in fs::read_dir(new_baseline)? {
        let entry = entry?;
        fs::rename(entry.path(), bl_dir.join(entry.file_name()))?;
    }
    Ok(())
}
