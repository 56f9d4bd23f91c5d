//! Binary entrypoint for the rcat API server.
use rcat_api::run;
use rcat_core::RunnerConfig;
use tracing_subscriber::EnvFilter;

/// Listen address override.
const ENV_ADDR: &str = "RCAT_ADDR";
const DEFAULT_ADDR: &str = "127.0.0.1:8787";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var(ENV_ADDR).unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    run(&addr, RunnerConfig::from_env()).await
}
