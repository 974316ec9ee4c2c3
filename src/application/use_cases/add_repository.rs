use crate::domain::external_apis::github::GitHubApi;
use crate::domain::models::repository::Repository;
use crate::domain::stores::key_value::KeyValueStore;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Storage key of the searched repositories list.
pub const REPOSITORIES_STORAGE_KEY: &str = "@GithubExplorer:repositories";

/// Reasons a submitted repository name is rejected. The message is shown to the user as is.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddRepositoryError {
    #[error("Informe o nome/repositorio no GitHub.")]
    EmptyInput,
    #[error("O repositório {0} já existe na lista.")]
    DuplicateEntry(String),
    #[error("Repositório não encontrado.")]
    NotFound,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    pub input_value: String,
    pub input_error: Option<String>,
    pub repositories: Vec<Repository>,
}

#[async_trait]
pub trait AddRepositoryUseCase {
    fn set_input(&mut self, value: String);
    /// Validates the current input, resolves it and appends it to the list.
    async fn submit(&mut self) -> Result<Repository, AddRepositoryError>;
    fn state(&self) -> &DashboardState;
}

pub struct AddRepositoryInteractor<G, S>
where
    G: GitHubApi + Send + Sync + 'static,
    S: KeyValueStore + Send + Sync + 'static,
{
    github_api: Arc<G>,
    store: Arc<S>,
    state: DashboardState,
}

impl<G, S> AddRepositoryInteractor<G, S>
where
    G: GitHubApi + Send + Sync + 'static,
    S: KeyValueStore + Send + Sync + 'static,
{
    /// Rehydrates the list from `store` and writes it back.
    pub fn new(github_api: Arc<G>, store: Arc<S>) -> Self {
        let repositories = load_repositories(store.as_ref());
        tracing::info!("Loaded {} repositories", repositories.len());

        let interactor = Self {
            github_api,
            store,
            state: DashboardState {
                repositories,
                ..DashboardState::default()
            },
        };
        if let Some(json) = interactor.serialized() {
            if let Err(e) = interactor.store.set_item(REPOSITORIES_STORAGE_KEY, &json) {
                tracing::error!("Failed to persist repositories: {:?}", e);
            }
        }
        interactor
    }

    fn serialized(&self) -> Option<String> {
        serde_json::to_string(&self.state.repositories)
            .inspect_err(|e| tracing::error!("Failed to serialize repositories: {:?}", e))
            .ok()
    }

    /// Overwrites the stored list off the async worker threads.
    async fn persist(&self) {
        let Some(json) = self.serialized() else {
            return;
        };
        let store = self.store.clone();
        match tokio::task::spawn_blocking(move || store.set_item(REPOSITORIES_STORAGE_KEY, &json))
            .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("Failed to persist repositories: {:?}", e),
            Err(e) => tracing::error!("Persist task failed: {:?}", e),
        }
    }

    fn find(&self, full_name: &str) -> Option<&Repository> {
        // linear scan, the list is expected to stay small
        self.state
            .repositories
            .iter()
            .find(|repo| repo.full_name == full_name)
    }

    async fn resolve(&self, input: &str) -> Result<Repository, AddRepositoryError> {
        if input.trim().is_empty() {
            return Err(AddRepositoryError::EmptyInput);
        }
        if self.find(input).is_some() {
            return Err(AddRepositoryError::DuplicateEntry(input.to_string()));
        }

        let repository: Repository = self
            .github_api
            .fetch_repository(input)
            .await
            .map_err(|e| {
                tracing::warn!("Failed to resolve repository {}: {:?}", input, e);
                AddRepositoryError::NotFound
            })?
            .into();

        Ok(repository)
    }
}

#[async_trait]
impl<G, S> AddRepositoryUseCase for AddRepositoryInteractor<G, S>
where
    G: GitHubApi + Send + Sync + 'static,
    S: KeyValueStore + Send + Sync + 'static,
{
    fn set_input(&mut self, value: String) {
        self.state.input_value = value;
    }

    #[tracing::instrument(name = "AddRepositoryInteractor::submit", skip(self))]
    async fn submit(&mut self) -> Result<Repository, AddRepositoryError> {
        let input = self.state.input_value.clone();
        match self.resolve(&input).await {
            Ok(repository) => {
                tracing::info!("Adding repository {}", repository.full_name);
                self.state.repositories.push(repository.clone());
                self.state.input_value.clear();
                self.state.input_error = None;
                self.persist().await;
                Ok(repository)
            }
            Err(e) => {
                tracing::debug!("Rejected input {:?}: {}", input, e);
                self.state.input_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn state(&self) -> &DashboardState {
        &self.state
    }
}

fn load_repositories<S: KeyValueStore>(store: &S) -> Vec<Repository> {
    let json = match store.get_item(REPOSITORIES_STORAGE_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::error!("Failed to read stored repositories: {:?}", e);
            return Vec::new();
        }
    };

    serde_json::from_str(&json).unwrap_or_else(|e| {
        tracing::warn!("Stored repositories are malformed, starting empty: {}", e);
        Vec::new()
    })
}
