//! Merged, resolved settings for one invocation.

use std::path::PathBuf;

use tracing::info;

use crate::config::{GitIdentity, GithubRepo, UserConfig};
use crate::machine;
use crate::prelude::*;

/// Values taken from the command line, all optional.
///
/// Kept free of any CLI framework so the merge logic stays testable; the
/// service binary maps its parsed arguments into this.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub machine: Option<String>,
    pub account: Option<String>,
    pub workdir: Option<PathBuf>,
    pub baseline: Option<PathBuf>,
    pub new_baseline: Option<PathBuf>,
    pub run_root: Option<PathBuf>,
    pub envfile: Option<PathBuf>,
    pub additional_args: Option<String>,
}

/// Fully merged settings: command line over configuration file over
/// per-machine defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub machine: String,
    pub account: String,
    /// Root under which per-PR working directories are staged.
    pub workdir: PathBuf,
    /// Shared baseline store; `None` only on machines without defaults.
    pub baseline_store: Option<PathBuf>,
    /// Explicit override for the new-baseline staging path. The built-in
    /// default depends on the compiler, so it is applied per job via
    /// [`Settings::new_baseline_for`].
    new_baseline: Option<PathBuf>,
    /// Scratch root holding the driver's `rt_*` run directories; consulted by
    /// the directory reaper. `None` disables run-directory cleanup.
    pub run_root: Option<PathBuf>,
    pub envfile: Option<PathBuf>,
    pub additional_args: Option<String>,
    pub git: GitIdentity,
    pub github: GithubRepo,
}

impl Settings {
    /// Merge the three configuration layers.
    ///
    /// `machine` falls back to hostname detection, `account` and `workdir` to
    /// the machine defaults; all three are mandatory after the merge. The
    /// remaining paths stay optional and are checked by the workflow that
    /// needs them.
    pub fn resolve(overrides: Overrides, config: UserConfig) -> Result<Self> {
        let machine = match overrides.machine.or(config.args.machine) {
            Some(machine) => machine,
            None => {
                let hostname =
                    std::env::var("HOSTNAME").map_err(|_| Error::MissingArgument("machine"))?;
                machine::machine_from_hostname(&hostname)?.to_string()
            }
        };
        let defaults = machine::defaults_for(&machine);

        let account = overrides
            .account
            .or(config.args.account)
            .or_else(|| {
                defaults
                    .as_ref()
                    .and_then(|d| d.account.map(String::from))
            })
            .ok_or(Error::MissingArgument("account"))?;

        let workdir = overrides
            .workdir
            .or(config.args.workdir)
            .or_else(|| defaults.as_ref().map(|d| d.workdir.clone()))
            .ok_or(Error::MissingArgument("workdir"))?;

        let baseline_store = overrides
            .baseline
            .or(config.args.baseline)
            .or_else(|| defaults.as_ref().map(|d| d.baseline_store.clone()));

        let run_root = overrides
            .run_root
            .or(config.args.run_root)
            .or_else(|| defaults.as_ref().map(|d| d.scratch_root.clone()));

        let settings = Self {
            machine,
            account,
            workdir,
            baseline_store,
            new_baseline: overrides.new_baseline.or(config.args.new_baseline),
            run_root,
            envfile: overrides.envfile.or(config.args.envfile),
            additional_args: overrides.additional_args.or(config.args.additional_args),
            git: config.git,
            github: config.github,
        };

        info!("machine: {}", settings.machine);
        info!("account: {}", settings.account);
        info!("workdir: {}", settings.workdir.display());

        Ok(settings)
    }

    /// Staging path for a new baseline produced with `compiler`.
    ///
    /// An explicit override wins; otherwise the machine's scratch-root
    /// convention applies.
    pub fn new_baseline_for(&self, compiler: &str) -> Option<PathBuf> {
        self.new_baseline.clone().or_else(|| {
            machine::defaults_for(&self.machine).map(|d| d.new_baseline(compiler))
        })
    }
}
