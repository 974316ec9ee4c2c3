use crate::domain::external_apis::github::GitHubApi;
use crate::domain::models::issue::{Issue, IssueAuthor};
use crate::domain::models::repository::{Owner, RepositoryDetails};
use anyhow::{Context, Error};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

const USER_AGENT: &str = "github-explorer-rust-app";

#[derive(Deserialize, Debug, Clone)]
struct GitHubOwnerResponse {
    login: String,
    avatar_url: String,
}

#[derive(Deserialize, Debug, Clone)]
struct GitHubRepositoryResponse {
    full_name: String, // e.g., "owner/repo"
    description: Option<String>,
    stargazers_count: u64,
    forks_count: u64,
    open_issues_count: u64,
    html_url: String,
    owner: GitHubOwnerResponse,
}

#[derive(Deserialize, Debug, Clone)]
struct GitHubUserResponse {
    login: String,
}

#[derive(Deserialize, Debug, Clone)]
struct GitHubIssueResponse {
    id: u64,
    title: String,
    html_url: String,
    user: GitHubUserResponse,
}

impl From<GitHubRepositoryResponse> for RepositoryDetails {
    fn from(res: GitHubRepositoryResponse) -> Self {
        Self {
            full_name: res.full_name,
            description: res.description,
            stargazers_count: res.stargazers_count,
            forks_count: res.forks_count,
            open_issues_count: res.open_issues_count,
            html_url: res.html_url,
            owner: Owner {
                login: res.owner.login,
                avatar_url: res.owner.avatar_url,
            },
        }
    }
}

impl From<GitHubIssueResponse> for Issue {
    fn from(res: GitHubIssueResponse) -> Self {
        Self {
            id: res.id,
            title: res.title,
            html_url: res.html_url,
            user: IssueAuthor {
                login: res.user.login,
            },
        }
    }
}

pub struct GitHubApiAdapter {
    client: Client,
    base_url: String,
    github_token: Option<String>,
}

impl GitHubApiAdapter {
    pub fn new(base_url: String, github_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            github_token,
        }
    }

    fn repository_url(&self, full_name: &str) -> String {
        format!("{}/repos/{}", self.base_url, full_name)
    }

    fn issues_url(&self, full_name: &str, page: u32, per_page: u8) -> String {
        format!(
            "{}/repos/{}/issues?page={}&per_page={}",
            self.base_url, full_name, page, per_page
        )
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", USER_AGENT);
        match &self.github_token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    /// Sends a single request and decodes the JSON body. Failures are not retried.
    async fn execute<T>(&self, operation_name: &str, request: RequestBuilder) -> Result<T, Error>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send request for {operation_name}"))?;
        let response = response
            .error_for_status()
            .with_context(|| format!("API returned an error for {operation_name}"))?;
        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to deserialize response for {operation_name}"))
    }
}

#[async_trait]
impl GitHubApi for GitHubApiAdapter {
    #[tracing::instrument(name = "GitHubApiAdapter::fetch_repository", skip(self))]
    async fn fetch_repository(&self, full_name: &str) -> Result<RepositoryDetails, Error> {
        let url = self.repository_url(full_name);
        let response: GitHubRepositoryResponse = self
            .execute(&format!("repository {full_name}"), self.get(&url))
            .await?;
        Ok(response.into())
    }

    #[tracing::instrument(name = "GitHubApiAdapter::fetch_issues", skip(self))]
    async fn fetch_issues(
        &self,
        full_name: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<Issue>, Error> {
        let url = self.issues_url(full_name, page, per_page);
        let response: Vec<GitHubIssueResponse> = self
            .execute(&format!("issues of {full_name}"), self.get(&url))
            .await?;
        Ok(response.into_iter().map(Issue::from).collect())
    }
}
