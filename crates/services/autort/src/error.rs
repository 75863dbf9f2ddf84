use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] autort_config::error::Error),

    #[error(transparent)]
    GitHub(#[from] autort_github::error::Error),

    #[error("failed to start `{command}`: {message}")]
    CommandLaunch { command: String, message: String },

    #[error("`{command}` started but its output could not be drained: {message}")]
    CommandRuntime { command: String, message: String },

    #[error("could not find regression test log {0}")]
    LogMissing(PathBuf),

    #[error("regression test log exists but is not complete")]
    LogIncomplete,

    #[error("regression test completed with {0} failed test(s)")]
    LogFailed(usize),

    #[error("baseline directory exists before creation: {0}")]
    BaselineAlreadyExists(PathBuf),

    #[error("baseline directory missing after creation: {0}")]
    BaselineCreateFailed(PathBuf),

    #[error("baseline date {0:?} is not formatted YYYYMMDD")]
    InvalidDateFormat(String),

    #[error("no BL_DATE line in {0}")]
    BaselineDateMissing(PathBuf),
}
