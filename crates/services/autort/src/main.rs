//! autort: label-triggered regression-test automation.
//!
//! One invocation is one polling pass:
//!
//! 1. load configuration and resolve machine-specific settings,
//! 2. list open pull requests on the watched base branch,
//! 3. reap working directories left over from closed pull requests,
//! 4. match each PR label against this machine and the approved actions,
//! 5. run the matched jobs strictly in sequence, reporting failures back
//!    to the pull request.
//!
//! The process exits with an error on the first job failure so the driving
//! cron job or wrapper script can observe it.

mod cli;
mod error;
mod job;
mod jobs;
mod label;
mod logscan;
mod prelude;
mod reaper;
mod report;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use autort_config::config::UserConfig;
use autort_config::settings::Settings;
use autort_github::GitHubClient;

use crate::cli::Cli;
use crate::job::{Job, JobContext, run_job};
use crate::label::{APPROVED_ACTIONS, match_label};
use crate::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;
    info!("Starting run");

    let config = match UserConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            error!("Could not load configuration file {:?}", cli.config);
            error!("See the repository README for how to create one");
            return Err(err.into());
        }
    };
    let settings = Settings::resolve(cli.overrides(), config)?;

    info!("Setting up GitHub interface");
    let github = GitHubClient::connect(
        &settings.github.org,
        &settings.github.repo,
        &settings.github.base,
    )?;

    info!("Getting all pull requests, labels and actions applicable to this machine");
    let pull_requests = github.open_pull_requests().await?;

    let open_ids: HashSet<String> = pull_requests.iter().map(|pr| pr.id.to_string()).collect();
    reaper::reap_stale_dirs(&settings.workdir, settings.run_root.as_deref(), &open_ids);

    let mut jobs = Vec::new();
    for pr in &pull_requests {
        for label in &pr.labels {
            if let Some((compiler, action)) =
                match_label(&settings.machine, &APPROVED_ACTIONS, label)
            {
                jobs.push(Job {
                    pr: pr.clone(),
                    compiler,
                    action,
                    label: label.clone(),
                });
            }
        }
    }
    info!("{} job(s) matched this machine", jobs.len());

    let ctx = JobContext {
        settings: &settings,
        github: &github,
    };
    for job in &jobs {
        run_job(&ctx, job).await?;
    }

    info!("Run finished");
    Ok(())
}

/// Log to stdout and to a timestamped file in the current directory.
fn init_tracing(debug: bool) -> Result<()> {
    let level = if debug { "debug" } else { "info" };
    let log_path = format!("autort_{}.log", Local::now().format("%Y%m%d%H%M%S"));
    let log_file = std::fs::File::create(&log_path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        )
        .init();
    Ok(())
}
