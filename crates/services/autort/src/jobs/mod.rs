//! Action workflows and the plumbing they share.
//!
//! Both actions start from the same place: a fresh timestamped clone of the
//! pull request's head branch under the working directory, followed by an
//! invocation of the cluster's own test driver. The driver's exit code is
//! never inspected here; the log file it writes is the authority on the
//! outcome.

pub mod bl;
pub mod rt;

use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::sync::mpsc::channel;
use tracing::{debug, error, info, warn};

use autort_config::settings::Settings;
use autort_io::command::CommandSpec;
use autort_io::runner::{RunEvent, Runner};

use crate::job::Job;
use crate::label::Compiler;
use crate::logscan::LogScan;
use crate::prelude::*;
use crate::report::Report;

/// A fresh checkout of the pull request's head branch.
pub(crate) struct Checkout {
    /// Timestamped staging directory: `<workdir>/<pr-id>/<timestamp>`.
    pub stage_dir: PathBuf,
    /// The clone itself: `<stage_dir>/<repo-name>`.
    pub repo_dir: PathBuf,
}

/// Run one command to completion, collecting its merged output lines.
///
/// The command's own exit code is logged but deliberately not treated as
/// failure; only a command that could not start, or whose output could not
/// be drained, fails the job.
pub(crate) async fn run_command(spec: CommandSpec) -> Result<Vec<String>> {
    let command = spec.rendered();
    let (tx, mut rx) = channel(64);
    let runner = Runner::new(spec);
    let handle = tokio::spawn(async move { runner.run(tx).await });

    let mut lines = Vec::new();
    let mut launch_failure: Option<String> = None;
    let mut io_failure: Option<String> = None;

    while let Some(event) = rx.recv().await {
        match event {
            RunEvent::ProcessCreationFailed(message) => {
                error!("Failed to run command `{command}` - {message}");
                launch_failure = Some(message);
            }
            RunEvent::ProcessCreated => debug!("Process started"),
            RunEvent::ProcessNewOutputLine(line) => {
                info!("{line}");
                lines.push(line);
            }
            RunEvent::ProcessIoFailed(message) => {
                error!("Lost output of `{command}` - {message}");
                io_failure = Some(message);
            }
            RunEvent::ProcessEnd(success) => {
                if success {
                    info!("Finished running: {command}");
                } else {
                    warn!("`{command}` exited with a failure status");
                }
            }
        }
    }
    let _ = handle.await;

    if let Some(message) = launch_failure {
        return Err(Error::CommandLaunch { command, message });
    }
    if let Some(message) = io_failure {
        error!("Partial output: {lines:?}");
        return Err(Error::CommandRuntime { command, message });
    }
    Ok(lines)
}

/// Clone the pull request's head branch into a fresh timestamped directory.
///
/// Initializes submodules recursively and applies the operator's git
/// identity to the clone so any commits made inside it are attributable.
pub(crate) async fn clone_pr_repo(
    settings: &Settings,
    job: &Job,
    report: &mut Report,
    tag: &str,
) -> Result<Checkout> {
    let stage_dir = settings
        .workdir
        .join(job.pr.id.to_string())
        .join(Local::now().format("%Y%m%d%H%M%S").to_string());
    let repo_dir = stage_dir.join(&job.pr.repo_name);
    debug!("GIT SSH URL: {}", job.pr.ssh_url);
    info!("Starting repo clone in {}", stage_dir.display());
    report.push(format!("[{tag}] Repo location: {}", repo_dir.display()));

    std::fs::create_dir_all(&stage_dir)?;

    let commands = [
        CommandSpec::new("git", &stage_dir)
            .args(["clone", "-b"])
            .arg(&job.pr.branch)
            .arg(&job.pr.ssh_url),
        CommandSpec::new("git", &repo_dir).args(["submodule", "update", "--init", "--recursive"]),
        CommandSpec::new("git", &repo_dir)
            .args(["config", "user.email"])
            .arg(&settings.git.user_email),
        CommandSpec::new("git", &repo_dir)
            .args(["config", "user.name"])
            .arg(&settings.git.user_name),
    ];
    for command in commands {
        run_command(command).await?;
    }

    info!("Finished repo clone");
    Ok(Checkout { stage_dir, repo_dir })
}

/// Build the test-driver invocation for this job.
///
/// The driver runs from the clone's `tests/` directory under a login shell,
/// with the compiler and run-directory root exported. `create_baseline`
/// adds the driver's baseline-generation flag; `gnu` selects the alternate
/// test configuration; operator-supplied extra arguments go last, verbatim.
pub(crate) fn driver_command(
    settings: &Settings,
    job: &Job,
    repo_dir: &Path,
    create_baseline: bool,
) -> CommandSpec {
    let mut spec = CommandSpec::new("/bin/bash", repo_dir.join("tests"))
        .env("RT_COMPILER", job.compiler.as_str())
        .env("RUNDIR_ROOT", settings.workdir.display().to_string())
        .args(["--login", "./rt.sh", "-e", "-a"])
        .arg(&settings.account)
        .arg("-p")
        .arg(&settings.machine);
    if create_baseline {
        spec = spec.arg("-c");
    }
    if job.compiler == Compiler::Gnu {
        spec = spec.args(["-l", "rt_gnu.conf"]);
    }
    if let Some(envfile) = &settings.envfile {
        spec = spec.arg("-s").arg(envfile.display().to_string());
    }
    if let Some(extra) = &settings.additional_args {
        spec = spec.args(extra.split_whitespace());
    }
    spec
}

/// Path of the log the driver writes for this machine.
pub(crate) fn regression_log(repo_dir: &Path, machine: &str) -> PathBuf {
    repo_dir
        .join("tests/logs")
        .join(format!("RegressionTests_{machine}.log"))
}

/// Append every collected failure line to the report.
pub(crate) fn record_failures(scan: &LogScan, tag: &str, report: &mut Report) {
    for line in &scan.failures {
        report.push(format!("[{tag}] Error: {line}"));
    }
}
