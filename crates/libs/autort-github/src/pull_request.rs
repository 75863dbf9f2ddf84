//! Pull-request data as the automation sees it.

/// One open pull request, reduced to the fields the automation acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// GitHub's numeric pull-request id. Working directories on disk are
    /// named after this value.
    pub id: u64,
    /// Pull-request number, used for label and comment API calls.
    pub number: u64,
    /// Head branch name to clone.
    pub branch: String,
    /// Name of the head repository.
    pub repo_name: String,
    /// SSH clone address of the head repository.
    pub ssh_url: String,
    /// Label names currently applied.
    pub labels: Vec<String>,
}
