//! Pull-request source for the autort service.
//!
//! Wraps the GitHub REST API behind the small surface the automation needs:
//! listing open pull requests (with head branch, clone address and labels) on
//! a base branch, removing a label, and posting an issue-style comment.
//!
//! Authentication uses a personal access token, read from the
//! `GH_ACCESS_TOKEN` environment variable or from an `accesstoken` file in
//! the current directory. The file must have mode `600`.

pub mod client;
pub mod error;
pub mod prelude;
pub mod pull_request;
pub mod token;

pub use client::GitHubClient;
pub use pull_request::PullRequest;
