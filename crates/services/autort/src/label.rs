//! Label matching.
//!
//! A triggering label has the form `<machine>-<compiler>-<action>`, e.g.
//! `hera-gnu-RT`. Anything that does not parse into exactly that shape for
//! this machine is silently ignored; an unrecognized label is normal filtering,
//! not an error.

use std::fmt;

/// Compilers the test driver supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compiler {
    Intel,
    Gnu,
}

impl Compiler {
    pub fn as_str(&self) -> &'static str {
        match self {
            Compiler::Intel => "intel",
            Compiler::Gnu => "gnu",
        }
    }

    /// Uppercase form used in baseline directory names.
    pub fn upper(&self) -> &'static str {
        match self {
            Compiler::Intel => "INTEL",
            Compiler::Gnu => "GNU",
        }
    }

    fn from_label_part(part: &str) -> Option<Self> {
        match part {
            "intel" => Some(Compiler::Intel),
            "gnu" => Some(Compiler::Gnu),
            _ => None,
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Actions a label may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Plain regression run against the existing baseline.
    Rt,
    /// Baseline creation, chained into a regression run.
    Bl,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Rt => "RT",
            Action::Bl => "BL",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Actions approved to run, fixed at startup.
pub const APPROVED_ACTIONS: [Action; 2] = [Action::Rt, Action::Bl];

/// Match a label name against this machine and the approved actions.
///
/// Returns `None` for anything that is not exactly
/// `<machine>-<compiler>-<action>` with a supported compiler and an approved
/// action. Matching is case-sensitive throughout.
pub fn match_label(machine: &str, approved: &[Action], label: &str) -> Option<(Compiler, Action)> {
    let mut parts = label.split('-');
    let (label_machine, label_compiler, label_action) =
        (parts.next()?, parts.next()?, parts.next()?);
    // Exactly three parts
    if parts.next().is_some() {
        return None;
    }
    if label_machine != machine {
        return None;
    }
    let compiler = Compiler::from_label_part(label_compiler)?;
    let action = approved
        .iter()
        .copied()
        .find(|action| action.as_str() == label_action)?;
    Some((compiler, action))
}
