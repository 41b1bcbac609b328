//! Axum HTTP surface for the JobLead tracker.

mod api;
mod config;
mod pages;
mod urls;

pub use config::AppConfig;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use joblead_ingest::JobImporter;
use joblead_notify::AnalysisNotifier;
use joblead_storage::{JobStore, LoggingStatusHook, StatusHook};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub store: JobStore,
    pub importer: Arc<JobImporter>,
    pub status_hook: Arc<dyn StatusHook>,
}

impl AppState {
    pub fn new(store: JobStore, notifier: Arc<dyn AnalysisNotifier>) -> Self {
        let importer = Arc::new(JobImporter::new(store.clone(), notifier));
        Self {
            store,
            importer,
            status_hook: Arc::new(LoggingStatusHook),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::dashboard))
        .route("/jobs/{id}", get(pages::job_detail))
        .route("/upload", get(pages::upload_form).post(pages::upload_submit))
        .route("/api/import", post(api::import))
        .route("/api/webhook", post(api::webhook_receive))
        .route("/api/status", post(api::update_status))
        .route("/api/jobs/update", post(api::update_job))
        .with_state(state)
}

/// Connect, migrate, and serve until shutdown.
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let store = JobStore::connect(&config.database_url).await?;
    store.migrate().await?;
    let state = AppState::new(store, config.build_notifier()?);

    let listener = TcpListener::bind(("0.0.0.0", config.listen_port)).await?;
    info!(port = config.listen_port, "joblead listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
