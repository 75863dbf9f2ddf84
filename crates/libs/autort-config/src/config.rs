//! User-provided configuration from TOML files.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::prelude::*;

/// Defaults for values that can also be given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArgDefaults {
    /// Machine name this configuration targets.
    pub machine: Option<String>,
    /// Account to charge for scheduler allocations.
    pub account: Option<String>,
    /// Directory where tests are staged and run.
    pub workdir: Option<PathBuf>,
    /// Directory where baseline data is stored.
    pub baseline: Option<PathBuf>,
    /// Staging directory for newly created baseline data.
    pub new_baseline: Option<PathBuf>,
    /// Scratch root holding the driver's `rt_*` run directories.
    pub run_root: Option<PathBuf>,
    /// Environment file sourced by the test driver.
    pub envfile: Option<PathBuf>,
    /// Extra arguments passed to the test driver verbatim.
    pub additional_args: Option<String>,
}

/// Git identity applied to every cloned checkout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitIdentity {
    pub user_name: String,
    pub user_email: String,
}

/// Repository the automation watches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GithubRepo {
    pub org: String,
    pub repo: String,
    pub base: String,
}

impl Default for GithubRepo {
    fn default() -> Self {
        Self {
            org: "ufs-community".to_string(),
            repo: "ufs-weather-model".to_string(),
            base: "main".to_string(),
        }
    }
}

/// The full configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserConfig {
    /// Fallbacks for command-line arguments.
    #[serde(default)]
    pub args: ArgDefaults,
    /// Git identity for commits made inside cloned checkouts.
    pub git: GitIdentity,
    /// Repository, organization and base branch to poll.
    #[serde(default)]
    pub github: GithubRepo,
}

impl UserConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(file_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(file_path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(value: &str) -> Result<Self> {
        Ok(toml::from_str(value)?)
    }
}
