use crate::domain::external_apis::github::GitHubApi;
use crate::domain::models::issue::Issue;
use crate::domain::models::repository::RepositoryDetails;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

/// Issues page shown on the detail screen
const ISSUES_PAGE: u32 = 1;

/// Number of open issues shown on the detail screen
const ISSUES_PER_PAGE: u8 = 5;

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryDetailView {
    pub full_name: String,
    pub repository: Option<RepositoryDetails>,
    pub issues: Vec<Issue>,
}

#[async_trait]
pub trait LoadRepositoryDetailUseCase {
    /// Loads metadata and issues of `full_name`, replacing whatever was shown before.
    async fn load(&self, full_name: &str);
    fn view(&self) -> RepositoryDetailView;
}

#[derive(Default)]
struct DetailSlot {
    generation: u64,
    view: RepositoryDetailView,
}

pub struct LoadRepositoryDetailInteractor<G: GitHubApi + Send + Sync + 'static> {
    github_api: Arc<G>,
    slot: Mutex<DetailSlot>,
}

impl<G: GitHubApi + Send + Sync + 'static> LoadRepositoryDetailInteractor<G> {
    pub fn new(github_api: Arc<G>) -> Self {
        Self {
            github_api,
            slot: Mutex::new(DetailSlot::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DetailSlot> {
        // the slot only holds plain data, a poisoned lock is still consistent
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn begin(&self, full_name: &str) -> u64 {
        let mut slot = self.lock();
        slot.generation += 1;
        slot.view = RepositoryDetailView {
            full_name: full_name.to_string(),
            ..RepositoryDetailView::default()
        };
        slot.generation
    }

    /// Applies `update` only if no newer load started since `generation`.
    fn apply(&self, generation: u64, update: impl FnOnce(&mut RepositoryDetailView)) {
        let mut slot = self.lock();
        if slot.generation != generation {
            tracing::debug!(
                "Discarding stale result of load {} (current {})",
                generation,
                slot.generation
            );
            return;
        }
        update(&mut slot.view);
    }
}

#[async_trait]
impl<G: GitHubApi + Send + Sync + 'static> LoadRepositoryDetailUseCase
    for LoadRepositoryDetailInteractor<G>
{
    #[tracing::instrument(name = "LoadRepositoryDetailInteractor::load", skip(self))]
    async fn load(&self, full_name: &str) {
        let generation = self.begin(full_name);

        let repository = async {
            match self.github_api.fetch_repository(full_name).await {
                Ok(repository) => {
                    self.apply(generation, |view| view.repository = Some(repository));
                }
                Err(e) => tracing::error!("Failed to fetch repository {}: {:?}", full_name, e),
            }
        };
        let issues = async {
            match self
                .github_api
                .fetch_issues(full_name, ISSUES_PAGE, ISSUES_PER_PAGE)
                .await
            {
                Ok(issues) => {
                    tracing::info!("Fetched {} issues for {}", issues.len(), full_name);
                    self.apply(generation, |view| view.issues = issues);
                }
                Err(e) => tracing::error!("Failed to fetch issues of {}: {:?}", full_name, e),
            }
        };

        futures_util::join!(repository, issues);
    }

    fn view(&self) -> RepositoryDetailView {
        self.lock().view.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::{MockGitHubApi, details, issue};
    use anyhow::Error;
    use std::sync::atomic::Ordering;
    use tokio::sync::Semaphore;

    #[tokio::test]
    async fn test_loads_repository_and_issues() {
        let api = Arc::new(
            MockGitHubApi::new()
                .with_repository("facebook/react")
                .with_issues("facebook/react", vec![issue(1, "first"), issue(2, "second")]),
        );
        let interactor = LoadRepositoryDetailInteractor::new(api.clone());

        interactor.load("facebook/react").await;

        let view = interactor.view();
        assert_eq!(view.full_name, "facebook/react");
        assert_eq!(view.repository, Some(details("facebook/react")));
        let titles: Vec<&str> = view.issues.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["first", "second"]);
        assert_eq!(api.repository_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.issue_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_issues_failure_still_shows_repository() {
        let api = Arc::new(MockGitHubApi::new().with_repository("facebook/react"));
        let interactor = LoadRepositoryDetailInteractor::new(api);

        interactor.load("facebook/react").await;

        let view = interactor.view();
        assert_eq!(view.repository, Some(details("facebook/react")));
        assert!(view.issues.is_empty());
    }

    #[tokio::test]
    async fn test_repository_failure_still_shows_issues() {
        let api = Arc::new(MockGitHubApi::new().with_issues("gone/repo", vec![issue(7, "open")]));
        let interactor = LoadRepositoryDetailInteractor::new(api);

        interactor.load("gone/repo").await;

        let view = interactor.view();
        assert_eq!(view.repository, None);
        assert_eq!(view.issues, vec![issue(7, "open")]);
    }

    #[tokio::test]
    async fn test_reload_with_other_name_replaces_view() {
        let api = Arc::new(
            MockGitHubApi::new()
                .with_repository("a/one")
                .with_issues("a/one", vec![issue(1, "one")])
                .with_repository("b/two"),
        );
        let interactor = LoadRepositoryDetailInteractor::new(api.clone());

        interactor.load("a/one").await;
        interactor.load("b/two").await;

        let view = interactor.view();
        assert_eq!(view.full_name, "b/two");
        assert_eq!(view.repository, Some(details("b/two")));
        assert!(view.issues.is_empty());
        assert_eq!(api.total_calls(), 4);
    }

    #[tokio::test]
    async fn test_late_results_of_superseded_load_are_discarded() -> Result<(), Error> {
        let gate = Arc::new(Semaphore::new(0));
        let api = Arc::new(
            MockGitHubApi::new()
                .with_repository("slow/repo")
                .with_issues("slow/repo", vec![issue(1, "slow")])
                .with_repository("fast/repo")
                .with_issues("fast/repo", vec![issue(2, "fast")])
                .with_gate("slow/repo", gate.clone()),
        );
        let interactor = Arc::new(LoadRepositoryDetailInteractor::new(api.clone()));

        let slow = tokio::spawn({
            let interactor = interactor.clone();
            async move { interactor.load("slow/repo").await }
        });
        while api.total_calls() < 2 {
            tokio::task::yield_now().await;
        }

        interactor.load("fast/repo").await;
        gate.add_permits(2);
        slow.await?;

        let view = interactor.view();
        assert_eq!(view.full_name, "fast/repo");
        assert_eq!(view.repository, Some(details("fast/repo")));
        assert_eq!(view.issues, vec![issue(2, "fast")]);
        Ok(())
    }
}
