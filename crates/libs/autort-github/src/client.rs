//! Octocrab-backed GitHub client.

use octocrab::Octocrab;
use octocrab::params;
use tracing::{debug, warn};

use crate::prelude::*;
use crate::pull_request::PullRequest;
use crate::token::load_token;

/// GitHub connection scoped to one repository and base branch.
pub struct GitHubClient {
    client: Octocrab,
    owner: String,
    repo: String,
    base: String,
}

impl GitHubClient {
    /// Authenticate and scope the client to `owner/repo` on `base`.
    pub fn connect(owner: &str, repo: &str, base: &str) -> Result<Self> {
        let token = load_token()?;
        let client = Octocrab::builder().personal_token(token).build()?;
        Ok(Self {
            client,
            owner: owner.to_string(),
            repo: repo.to_string(),
            base: base.to_string(),
        })
    }

    /// List every open pull request against the base branch, oldest first.
    ///
    /// Pull requests whose head repository or SSH address is unavailable
    /// (e.g. a deleted fork) are skipped with a warning.
    pub async fn open_pull_requests(&self) -> Result<Vec<PullRequest>> {
        let page = self
            .client
            .pulls(&self.owner, &self.repo)
            .list()
            .state(params::State::Open)
            .base(&self.base)
            .sort(params::pulls::Sort::Created)
            .per_page(100)
            .send()
            .await?;
        let items = self.client.all_pages(page).await?;

        let mut pull_requests = Vec::new();
        for pr in items {
            let Some(repo) = pr.head.repo.as_ref() else {
                warn!("PR #{} has no head repository, skipping", pr.number);
                continue;
            };
            let Some(ssh_url) = repo.ssh_url.clone() else {
                warn!("PR #{} head repository has no SSH address, skipping", pr.number);
                continue;
            };
            pull_requests.push(PullRequest {
                id: pr.id.into_inner(),
                number: pr.number,
                branch: pr.head.ref_field.clone(),
                repo_name: repo.name.clone(),
                ssh_url,
                labels: pr
                    .labels
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .map(|label| label.name.clone())
                    .collect(),
            });
        }
        debug!("{} open pull request(s)", pull_requests.len());
        Ok(pull_requests)
    }

    /// Fetch the current label names on a pull request.
    pub async fn labels(&self, number: u64) -> Result<Vec<String>> {
        let page = self
            .client
            .issues(&self.owner, &self.repo)
            .list_labels_for_issue(number)
            .per_page(100)
            .send()
            .await?;
        let labels = self.client.all_pages(page).await?;
        Ok(labels.into_iter().map(|label| label.name).collect())
    }

    /// Remove a label from a pull request.
    pub async fn remove_label(&self, number: u64, label: &str) -> Result<()> {
        self.client
            .issues(&self.owner, &self.repo)
            .remove_label(number, label)
            .await?;
        Ok(())
    }

    /// Post an issue-style comment on a pull request.
    pub async fn post_comment(&self, number: u64, body: &str) -> Result<()> {
        self.client
            .issues(&self.owner, &self.repo)
            .create_comment(number, body)
            .await?;
        Ok(())
    }
}
