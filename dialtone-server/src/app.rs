use crate::{ServerConfig, SignalingRouter, ws_handler};
use anyhow::{Context, Result};
use axum::routing::get;
use dialtone_core::utils::SIGNALING_PATH;
use tokio::net::TcpListener;
use tracing::info;

pub fn app(router: SignalingRouter) -> axum::Router {
    axum::Router::new()
        .route("/", get(health))
        .route(SIGNALING_PATH, get(ws_handler))
        .with_state(router)
}

async fn health() -> &'static str {
    "Signaling server running"
}

pub async fn serve(config: ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;

    serve_on(listener, SignalingRouter::new()).await
}

/// Runs the signaling server on an already bound listener until it fails.
pub async fn serve_on(listener: TcpListener, router: SignalingRouter) -> Result<()> {
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, app(router))
        .await
        .context("Signaling server stopped")?;
    Ok(())
}
