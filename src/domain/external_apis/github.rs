use crate::domain::models::issue::Issue;
use crate::domain::models::repository::RepositoryDetails;
use anyhow::Error;
use async_trait::async_trait;

#[async_trait]
pub trait GitHubApi {
    /// `GET /repos/{full_name}`
    async fn fetch_repository(&self, full_name: &str) -> Result<RepositoryDetails, Error>;
    /// `GET /repos/{full_name}/issues?page={page}&per_page={per_page}`
    async fn fetch_issues(
        &self,
        full_name: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<Issue>, Error>;
}
