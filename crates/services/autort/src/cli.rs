//! Command-line interface for the autort service.

use clap::Parser;
use std::path::PathBuf;

use autort_config::settings::Overrides;

/// Label-triggered regression-test automation.
///
/// Polls open pull requests once, runs every job whose label matches this
/// machine, and exits. Meant to be driven from cron or a wrapper script.
#[derive(Parser)]
#[command(name = "autort")]
#[command(about = "Run label-triggered regression tests for open pull requests")]
pub struct Cli {
    /// Current machine name (detected from the hostname when omitted)
    #[arg(short, long)]
    pub machine: Option<String>,

    /// Account to charge for scheduler allocations
    #[arg(short, long)]
    pub account: Option<String>,

    /// Directory where tests are staged and run
    #[arg(short, long)]
    pub workdir: Option<PathBuf>,

    /// Directory where baseline data is stored
    #[arg(short, long)]
    pub baseline: Option<PathBuf>,

    /// Staging directory for newly created baseline data
    #[arg(long)]
    pub new_baseline: Option<PathBuf>,

    /// Scratch root holding the driver's rt_* run directories
    #[arg(long)]
    pub run_root: Option<PathBuf>,

    /// Environment file sourced by the test driver
    #[arg(short, long)]
    pub envfile: Option<PathBuf>,

    /// Configuration file with fallbacks for these arguments
    #[arg(short, long, default_value = "autort.toml")]
    pub config: PathBuf,

    /// Additional arguments passed to the test driver verbatim
    #[arg(long)]
    pub additional_args: Option<String>,

    /// More verbose logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    /// The configuration overrides carried by this command line.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            machine: self.machine.clone(),
            account: self.account.clone(),
            workdir: self.workdir.clone(),
            baseline: self.baseline.clone(),
            new_baseline: self.new_baseline.clone(),
            run_root: self.run_root.clone(),
            envfile: self.envfile.clone(),
            additional_args: self.additional_args.clone(),
        }
    }
}
