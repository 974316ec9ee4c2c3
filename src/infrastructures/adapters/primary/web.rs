use crate::application::use_cases::add_repository::{
    AddRepositoryInteractor, AddRepositoryUseCase, DashboardState,
};
use crate::application::use_cases::load_repository_detail::{
    LoadRepositoryDetailInteractor, LoadRepositoryDetailUseCase, RepositoryDetailView,
};
use crate::infrastructures::adapters::secondary::external_apis::github::GitHubApiAdapter;
use crate::infrastructures::adapters::secondary::stores::json_file::JsonFileStore;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

pub type Dashboard = AddRepositoryInteractor<GitHubApiAdapter, JsonFileStore>;

// The dashboard lock is held for the whole submit, so only one resolve is in flight.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Mutex<Dashboard>>,
    pub github_api: Arc<GitHubApiAdapter>,
}

#[derive(Deserialize, Debug)]
pub struct SetInputRequest {
    pub value: String,
}

#[derive(Deserialize, Debug)]
pub struct AddRepositoryRequest {
    pub full_name: String,
}

#[tracing::instrument(name = "get_dashboard", skip(state))]
async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardState> {
    Json(state.dashboard.lock().await.state().clone())
}

#[tracing::instrument(name = "set_input", skip(state))]
async fn set_input(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetInputRequest>,
) -> Json<DashboardState> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.set_input(request.value);
    Json(dashboard.state().clone())
}

async fn submit_locked(dashboard: &mut Dashboard) -> (StatusCode, Json<DashboardState>) {
    let status = match dashboard.submit().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(dashboard.state().clone()))
}

#[tracing::instrument(name = "submit", skip(state))]
async fn submit(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut dashboard = state.dashboard.lock().await;
    submit_locked(&mut dashboard).await
}

#[tracing::instrument(name = "add_repository", skip(state))]
async fn add_repository(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddRepositoryRequest>,
) -> impl IntoResponse {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.set_input(request.full_name);
    submit_locked(&mut dashboard).await
}

#[axum::debug_handler]
#[tracing::instrument(name = "repository_detail", skip(state))]
async fn repository_detail(
    State(state): State<Arc<AppState>>,
    Path((owner, name)): Path<(String, String)>,
) -> Json<RepositoryDetailView> {
    // every visit starts from an empty view, nothing is cached between requests
    let loader = LoadRepositoryDetailInteractor::new(state.github_api.clone());
    loader.load(&format!("{owner}/{name}")).await;
    Json(loader.view())
}

#[tracing::instrument(name = "health_check")]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/dashboard/input", put(set_input))
        .route("/api/dashboard/submit", post(submit))
        .route("/api/repositories", post(add_repository))
        .route("/api/repositories/{owner}/{name}", get(repository_detail))
        .route("/health", get(health_check))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
