use std::sync::Arc;

use anyhow::{Context, Result};
use insights_service::{config::AppConfig, metrics_server, observability, routes};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    let state = routes::AppState::from_config(&cfg)?;
    tracing::info!(
        mode = ?state.data_source,
        aggregator = %cfg.aggregator.base_url(),
        "starting insights service"
    );
    let app = routes::create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&cfg.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.bind_addr))?;
    tracing::info!(addr = %cfg.server.bind_addr, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
