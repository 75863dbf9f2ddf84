//! Supported machines: hostname detection and filesystem defaults.
//!
//! Each cluster the automation runs on has a conventional layout: a small
//! working directory where pull requests are staged, a shared baseline store,
//! and a large scratch root where the test driver places both its `rt_*` run
//! directories and freshly generated `REGRESSION_TEST_*` baseline data. The
//! table below mirrors that layout so operators only override paths for
//! unusual setups.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::prelude::*;

/// Built-in filesystem defaults for one machine.
#[derive(Debug, Clone)]
pub struct MachineDefaults {
    /// Root under which per-PR working directories are staged.
    pub workdir: PathBuf,
    /// Shared store of existing baseline data sets.
    pub baseline_store: PathBuf,
    /// Scratch root holding `rt_*` run directories and new-baseline staging.
    pub scratch_root: PathBuf,
    /// Account to charge when none is configured.
    pub account: Option<&'static str>,
}

impl MachineDefaults {
    fn new(workdir: &str, baseline_store: &str, scratch_root: &str) -> Self {
        Self {
            workdir: PathBuf::from(workdir),
            baseline_store: PathBuf::from(baseline_store),
            scratch_root: PathBuf::from(scratch_root),
            account: None,
        }
    }

    fn account(mut self, account: &'static str) -> Self {
        self.account = Some(account);
        self
    }

    /// Default staging path for a freshly generated baseline.
    ///
    /// The test driver writes new baseline data to
    /// `<scratch>/REGRESSION_TEST_<COMPILER>`, with the compiler uppercased.
    pub fn new_baseline(&self, compiler: &str) -> PathBuf {
        self.scratch_root
            .join(format!("REGRESSION_TEST_{}", compiler.to_uppercase()))
    }
}

/// Look up the built-in defaults for a machine name.
pub fn defaults_for(machine: &str) -> Option<MachineDefaults> {
    let defaults = match machine {
        "hera" => MachineDefaults::new(
            "/scratch1/NCEPDEV/nems/emc.nemspara/autort/pr",
            "/scratch1/NCEPDEV/nems/emc.nemspara/RT/NEMSfv3gfs",
            "/scratch1/NCEPDEV/nems/emc.nemspara/FV3_RT",
        ),
        "jet" => MachineDefaults::new(
            "/lfs4/HFIP/h-nems/emc.nemspara/autort/pr",
            "/lfs4/HFIP/h-nems/emc.nemspara/RT/NEMSfv3gfs",
            "/lfs4/HFIP/h-nems/emc.nemspara/FV3_RT",
        )
        .account("h-nems"),
        "gaea" => MachineDefaults::new(
            "/lustre/f2/pdata/ncep/emc.nemspara/autort/pr",
            "/lustre/f2/pdata/ncep_shared/emc.nemspara/RT/NEMSfv3gfs",
            "/lustre/f2/scratch/emc.nemspara/FV3_RT",
        )
        .account("nggps_emc"),
        "orion" => MachineDefaults::new(
            "/work/noaa/nems/emc.nemspara/autort/pr",
            "/work/noaa/nems/emc.nemspara/RT/NEMSfv3gfs",
            "/work/noaa/stmp/emc.nemspara/FV3_RT",
        ),
        "derecho" => MachineDefaults::new(
            "/glade/scratch/dtcufsrt/autort/pr",
            "/glade/p/ral/jntp/GMTB/ufs-weather-model/RT/NEMSfv3gfs",
            "/glade/scratch/dtcufsrt/FV3_RT",
        )
        .account("P48503002"),
        _ => return None,
    };
    Some(defaults)
}

static HOST_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        ("^hfe.+", "hera"),
        ("^hecflow.+", "hera"),
        ("^fe.+", "jet"),
        ("^gaea.+", "gaea"),
        ("^Orion-login.+", "orion"),
        ("^chadmin.+", "derecho"),
    ]
    .into_iter()
    .map(|(pattern, machine)| (Regex::new(pattern).expect("valid host pattern"), machine))
    .collect()
});

/// Map a login-node hostname to the machine name it belongs to.
pub fn machine_from_hostname(hostname: &str) -> Result<&'static str> {
    HOST_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(hostname))
        .map(|(_, machine)| *machine)
        .ok_or_else(|| Error::UnknownHost(hostname.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_hostnames_map_to_machines() {
        assert_eq!(machine_from_hostname("hfe01").unwrap(), "hera");
        assert_eq!(machine_from_hostname("hecflow02").unwrap(), "hera");
        assert_eq!(machine_from_hostname("fe3").unwrap(), "jet");
        assert_eq!(machine_from_hostname("gaea51").unwrap(), "gaea");
        assert_eq!(machine_from_hostname("Orion-login-4").unwrap(), "orion");
        assert_eq!(machine_from_hostname("chadmin1").unwrap(), "derecho");
    }

    #[test]
    fn unknown_hostname_is_an_error() {
        assert!(matches!(
            machine_from_hostname("workstation"),
            Err(Error::UnknownHost(_))
        ));
    }

    #[test]
    fn hostname_match_is_anchored() {
        // "fe" only matches at the start, not inside another name
        assert!(matches!(
            machine_from_hostname("coffee-machine"),
            Err(Error::UnknownHost(_))
        ));
    }

    #[test]
    fn new_baseline_embeds_uppercased_compiler() {
        let defaults = defaults_for("hera").unwrap();
        assert_eq!(
            defaults.new_baseline("gnu"),
            PathBuf::from("/scratch1/NCEPDEV/nems/emc.nemspara/FV3_RT/REGRESSION_TEST_GNU")
        );
    }

    #[test]
    fn unsupported_machine_has_no_defaults() {
        assert!(defaults_for("cheyenne").is_none());
    }
}
