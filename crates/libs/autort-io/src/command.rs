//! Command specifications.
//!
//! A [`CommandSpec`] captures everything needed to launch one subprocess:
//! program, arguments, working directory and environment overrides. Building
//! the invocation as data keeps the wire contract with external drivers
//! explicit and lets callers log the exact command before it runs.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::{Child, Command};

/// One subprocess invocation, described as data.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Program to execute.
    pub program: String,
    /// Command line arguments.
    pub args: Vec<String>,
    /// Working directory the process starts in.
    pub cwd: PathBuf,
    /// Environment variables set on top of the inherited environment.
    pub envs: Vec<(String, String)>,
}

impl CommandSpec {
    /// Create a spec for `program` running in `cwd`, with no arguments.
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            envs: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Set an environment variable for the child process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// The rendered command text, suitable for logs and error messages.
    pub fn rendered(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    /// Spawn the process with stdout and stderr piped.
    ///
    /// A missing working directory or executable surfaces here as an
    /// `io::Error`; the process never starts.
    pub(crate) fn spawn(&self) -> io::Result<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.cwd)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rendered())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn renders_program_and_args() {
        let spec = CommandSpec::new("git", "/tmp")
            .arg("clone")
            .args(["-b", "feature/foo"]);
        assert_eq!(spec.rendered(), "git clone -b feature/foo");
        assert_eq!(format!("{spec}"), "git clone -b feature/foo");
    }

    #[test]
    fn renders_bare_program() {
        let spec = CommandSpec::new("pwd", "/");
        assert_eq!(spec.rendered(), "pwd");
    }

    #[test]
    fn accumulates_envs() {
        let spec = CommandSpec::new("rt.sh", "/tmp")
            .env("RT_COMPILER", "gnu")
            .env("RUNDIR_ROOT", "/scratch");
        assert_eq!(
            spec.envs,
            vec![
                ("RT_COMPILER".to_string(), "gnu".to_string()),
                ("RUNDIR_ROOT".to_string(), "/scratch".to_string()),
            ]
        );
    }
}
