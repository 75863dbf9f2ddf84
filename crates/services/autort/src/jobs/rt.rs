//! Plain regression run against the existing baseline.

use tracing::info;

use autort_config::settings::Settings;

use crate::job::Job;
use crate::jobs::{clone_pr_repo, driver_command, record_failures, regression_log, run_command};
use crate::logscan::{self, Verdict};
use crate::prelude::*;
use crate::report::Report;

/// Clone, run the test driver, and judge the outcome from its log.
pub async fn run(settings: &Settings, job: &Job, report: &mut Report) -> Result<()> {
    let checkout = clone_pr_repo(settings, job, report, "RT").await?;

    run_command(driver_command(settings, job, &checkout.repo_dir, false)).await?;

    let log = regression_log(&checkout.repo_dir, &settings.machine);
    let scan = logscan::inspect(&log)?;
    record_failures(&scan, "RT", report);

    match scan.verdict {
        Verdict::Missing => {
            report.push(format!("[RT] ERROR: could not find log {}", log.display()));
            Err(Error::LogMissing(log))
        }
        Verdict::Incomplete => Err(Error::LogIncomplete),
        Verdict::Success { run_dir } => {
            if !scan.failures.is_empty() {
                return Err(Error::LogFailed(scan.failures.len()));
            }
            if let Some(run_dir) = run_dir {
                info!("Run directory: {}", run_dir.display());
            }
            info!(
                "Regression test successful, checkout retained at {}",
                checkout.stage_dir.display()
            );
            Ok(())
        }
    }
}
