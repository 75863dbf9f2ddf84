//! GitHub interface error types.

/// GitHub interface errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error(transparent)]
    IO(#[from] std::io::Error),

    /// GitHub API request failed.
    #[error(transparent)]
    Api(#[from] octocrab::Error),

    /// No token in the environment and no `accesstoken` file.
    #[error("no GitHub token: set GH_ACCESS_TOKEN or create an \"accesstoken\" file")]
    TokenMissing,

    /// The token file is readable by more than its owner.
    #[error("token file {path} must have mode 600, found {mode:o}")]
    TokenFilePermissions { path: String, mode: u32 },
}
