//! rcat API /v1: REST endpoints over the categorical test pipeline
pub mod handlers;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use handlers::AppState;
use rcat_core::RunnerConfig;
use rcat_runner::Pipeline;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/tests", post(handlers::run_test))
        .route("/v1/methods", get(handlers::list_methods))
        .route("/v1/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(addr: &str, config: RunnerConfig) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_config(config).context("failed to load script templates")?;
    tracing::info!(?pipeline, "pipeline ready");
    let app = create_app(AppState {
        pipeline: Arc::new(pipeline),
    });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("rcat API listening on {}", addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
