use github_explorer::application::use_cases::add_repository::AddRepositoryInteractor;
use github_explorer::config::Config;
use github_explorer::infrastructures::adapters::primary::web::{AppState, create_router};
use github_explorer::infrastructures::adapters::secondary::external_apis::github::GitHubApiAdapter;
use github_explorer::infrastructures::adapters::secondary::stores::json_file::JsonFileStore;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::env;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, info_span};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() -> anyhow::Result<Option<SdkTracerProvider>> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_file(true)
        .with_line_number(true);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Spans are exported only when a collector is configured
    if env::var_os("OTEL_EXPORTER_OTLP_ENDPOINT").is_none() {
        tracing_subscriber::registry()
            .with(fmt_layer)
            .with(filter)
            .init();
        return Ok(None);
    }

    let otlp_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create OTLP exporter: {}", e))?;
    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(otlp_exporter)
        .build();
    let tracer = provider.tracer("github-explorer");
    let telemetry = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(telemetry)
        .with(filter)
        .init();
    Ok(Some(provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let provider = init_tracing()?;

    let initialize_span = info_span!("initialize");
    let (app_state, addr) = {
        let _enter = initialize_span.enter();
        info!("Application starting");

        let config = Config::from_env()?;
        info!(
            "Using GitHub API at {} with store {}",
            config.github_api_base_url,
            config.store_path.display()
        );

        // Build dependencies
        let github_api_adapter = Arc::new(GitHubApiAdapter::new(
            config.github_api_base_url,
            config.github_token,
        ));
        let store = Arc::new(JsonFileStore::open(&config.store_path)?);
        let dashboard = AddRepositoryInteractor::new(github_api_adapter.clone(), store);
        (
            Arc::new(AppState {
                dashboard: Arc::new(Mutex::new(dashboard)),
                github_api: github_api_adapter,
            }),
            config.addr,
        )
    };

    // Create router
    let app = create_router(app_state);

    // Start server
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    if let Some(provider) = provider {
        provider
            .shutdown()
            .map_err(|e| anyhow::anyhow!("Failed to shut down tracer provider: {}", e))?;
    }

    Ok(())
}
