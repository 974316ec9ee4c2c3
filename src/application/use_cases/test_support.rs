use crate::domain::external_apis::github::GitHubApi;
use crate::domain::models::issue::{Issue, IssueAuthor};
use crate::domain::models::repository::{Owner, RepositoryDetails};
use anyhow::{Error, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

pub fn details(full_name: &str) -> RepositoryDetails {
    let owner = full_name.split('/').next().unwrap_or_default();
    RepositoryDetails {
        full_name: full_name.to_string(),
        description: Some(format!("Description of {full_name}")),
        stargazers_count: 10,
        forks_count: 2,
        open_issues_count: 1,
        html_url: format!("https://github.com/{full_name}"),
        owner: Owner {
            login: owner.to_string(),
            avatar_url: format!("https://avatars.example.com/{owner}"),
        },
    }
}

pub fn issue(id: u64, title: &str) -> Issue {
    Issue {
        id,
        title: title.to_string(),
        html_url: format!("https://github.com/issues/{id}"),
        user: IssueAuthor {
            login: "octocat".to_string(),
        },
    }
}

/// In-memory GitHub API with call counters and an optional gate that holds
/// requests for one repository until permits are released.
#[derive(Default)]
pub struct MockGitHubApi {
    repositories: HashMap<String, RepositoryDetails>,
    issues: HashMap<String, Vec<Issue>>,
    gated: Option<(String, Arc<Semaphore>)>,
    pub repository_calls: AtomicUsize,
    pub issue_calls: AtomicUsize,
}

impl MockGitHubApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `details` under the name the caller will request.
    pub fn with_repository_as(mut self, requested: &str, details: RepositoryDetails) -> Self {
        self.repositories.insert(requested.to_string(), details);
        self
    }

    pub fn with_repository(self, full_name: &str) -> Self {
        self.with_repository_as(full_name, details(full_name))
    }

    pub fn with_issues(mut self, full_name: &str, issues: Vec<Issue>) -> Self {
        self.issues.insert(full_name.to_string(), issues);
        self
    }

    pub fn with_gate(mut self, full_name: &str, gate: Arc<Semaphore>) -> Self {
        self.gated = Some((full_name.to_string(), gate));
        self
    }

    pub fn total_calls(&self) -> usize {
        self.repository_calls.load(Ordering::SeqCst) + self.issue_calls.load(Ordering::SeqCst)
    }

    async fn wait_gate(&self, full_name: &str) -> Result<(), Error> {
        if let Some((name, gate)) = &self.gated {
            if name == full_name {
                gate.acquire().await?.forget();
            }
        }
        Ok(())
    }
}

#[async_trait]
impl GitHubApi for MockGitHubApi {
    async fn fetch_repository(&self, full_name: &str) -> Result<RepositoryDetails, Error> {
        self.repository_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate(full_name).await?;
        self.repositories
            .get(full_name)
            .cloned()
            .ok_or_else(|| anyhow!("404 Not Found: {full_name}"))
    }

    async fn fetch_issues(
        &self,
        full_name: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<Issue>, Error> {
        self.issue_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate(full_name).await?;
        assert_eq!((page, per_page), (1, 5));
        self.issues
            .get(full_name)
            .cloned()
            .ok_or_else(|| anyhow!("500 Internal Server Error: {full_name}"))
    }
}
