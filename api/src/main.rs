//! Pollen Prophet API Server
//!
//! Pulls a satirical news feed, has an LLM punch up every new headline and
//! summary, stores the results and serves them as htmx fragments.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::time::MissedTickBehavior;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;
mod views;

#[cfg(test)]
mod test_utils;


use adapters::{FileImprovementRepository, GroqClient, HttpFeedSource, PostgresImprovementRepository};
use app::{MigrationService, RefreshService, RewriteService};
use config::{Config, StorageBackend};
use domain::ports::{FeedSource, ImprovementRepository, LlmClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub refresh_service:
        Arc<RefreshService<dyn FeedSource, dyn ImprovementRepository, dyn LlmClient>>,
    pub rewrite_service: Arc<RewriteService<dyn LlmClient>>,
    pub migration_service: Arc<MigrationService<dyn ImprovementRepository>>,
    pub repo: Arc<dyn ImprovementRepository>,
}

impl AppState {
    /// Wire services around one feed, one repository and one LLM client
    pub fn new(
        feed: Arc<dyn FeedSource>,
        repo: Arc<dyn ImprovementRepository>,
        llm: Arc<dyn LlmClient>,
        title_history: usize,
    ) -> Self {
        let rewrite_service = Arc::new(RewriteService::new(llm));
        let refresh_service = Arc::new(RefreshService::new(
            feed,
            repo.clone(),
            rewrite_service.clone(),
            title_history,
        ));
        let migration_service = Arc::new(MigrationService::new(repo.clone()));

        Self {
            refresh_service,
            rewrite_service,
            migration_service,
            repo,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the HTTP surface
pub fn router(state: AppState, cors: CorsLayer, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(health))
        .route("/update", get(handlers::update))
        .route("/migrate", post(handlers::migrate))
        .route("/improve-title", get(handlers::improve_title))
        .route("/improve-summary", get(handlers::improve_summary))
        .route("/improvements", get(handlers::list_improvements))
        .route("/improvements/:id", get(handlers::get_improvement))
        .route("/originals", get(handlers::list_originals))
        .nest_service("/static", ServeDir::new(static_dir))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin in development, the configured list otherwise
fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if config.dev_mode {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Run a refresh every `period`, starting immediately
fn spawn_scheduled_refresh(state: &AppState, period: std::time::Duration) {
    let refresh_service = state.refresh_service.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match refresh_service.refresh().await {
                Ok(created) => {
                    tracing::info!("Scheduled refresh created {} improvements", created.len())
                }
                Err(e) => tracing::error!("Scheduled refresh failed: {}", e),
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Invalid configuration")?;

    // Initialize tracing
    let default_filter = if config.dev_mode {
        "info,prophet_api=debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Pollen Prophet API...");

    // Create adapters
    let repo: Arc<dyn ImprovementRepository> = match &config.storage {
        StorageBackend::File { dir } => {
            let repo = FileImprovementRepository::open(dir.clone()).await?;
            tracing::info!("Storing improvements in {}", repo.dir().display());
            Arc::new(repo)
        }
        StorageBackend::Postgres { database_url } => {
            tracing::info!("Connecting to database...");
            let repo = PostgresImprovementRepository::connect(database_url).await?;
            tracing::info!("Database connected");
            Arc::new(repo)
        }
    };

    let llm = Arc::new(GroqClient::new(
        config.groq_base_url.clone(),
        config.groq_api_key.clone(),
        config.groq_model.clone(),
        config.llm_timeout,
    )?);
    tracing::info!("Using model {}", llm.model());

    let feed = Arc::new(HttpFeedSource::new(config.feed_url.clone()));
    tracing::info!("Reading feed {}", feed.url());

    // Create application services
    let state = AppState::new(feed, repo, llm, config.title_history);

    match config.refresh_interval {
        Some(period) => {
            tracing::info!("Refreshing every {}s", period.as_secs());
            spawn_scheduled_refresh(&state, period);
        }
        None => tracing::info!("Scheduled refresh disabled"),
    }

    let app = router(state, cors_layer(&config), &config.static_dir);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
