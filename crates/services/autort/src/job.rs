//! One unit of work bound to one pull request and one label.

use tracing::{error, info};

use autort_config::settings::Settings;
use autort_github::{GitHubClient, PullRequest};

use crate::jobs;
use crate::label::{Action, Compiler};
use crate::prelude::*;
use crate::report::Report;

/// A matched (pull request, label) pair, ready to run.
///
/// Jobs are rediscovered from GitHub on every poll; nothing about them
/// persists across invocations.
#[derive(Debug, Clone)]
pub struct Job {
    pub pr: PullRequest,
    pub compiler: Compiler,
    pub action: Action,
    /// The label that triggered this job, exactly as it appears on the PR.
    pub label: String,
}

/// Shared context the lifecycle threads through each job.
pub struct JobContext<'a> {
    pub settings: &'a Settings,
    pub github: &'a GitHubClient,
}

/// Drive one job end to end.
///
/// The triggering label is re-checked immediately before execution: another
/// invocation may have consumed it since the poll, in which case this job is
/// a no-op, not a failure. Removing the label claims the job; from then on
/// any failure is reported back to the pull request as a comment and
/// propagated so the poll loop sees it.
pub async fn run_job(ctx: &JobContext<'_>, job: &Job) -> Result<()> {
    info!("Starting job: {}", job.label);
    let mut report = Report::new();
    report.push(format!("Machine: {}", ctx.settings.machine));
    report.push(format!("Compiler: {}", job.compiler));
    report.push(format!("Job: {}", job.action));

    let labels = ctx.github.labels(job.pr.number).await?;
    if !labels.iter().any(|name| name == &job.label) {
        info!("Cannot find label {}", job.label);
        return Ok(());
    }

    let result = claim_and_dispatch(ctx, job, &mut report).await;

    if let Err(err) = result {
        error!("{} FAILED: {err}", job.label);
        report.push(format!(
            "Please make changes and add the following label back: {}",
            job.label
        ));
        info!("Sending comment text");
        if let Err(comment_err) = ctx.github.post_comment(job.pr.number, &report.render()).await {
            error!("Could not post failure comment: {comment_err}");
        }
        return Err(err);
    }
    Ok(())
}

async fn claim_and_dispatch(ctx: &JobContext<'_>, job: &Job, report: &mut Report) -> Result<()> {
    info!("Removing label: {}", job.label);
    ctx.github.remove_label(job.pr.number, &job.label).await?;

    match job.action {
        Action::Rt => jobs::rt::run(ctx.settings, job, report).await,
        Action::Bl => jobs::bl::run(ctx.settings, job, report).await,
    }
}
