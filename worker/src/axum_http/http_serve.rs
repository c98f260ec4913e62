use crate::axum_http::default_routers;
use anyhow::Result;
use axum::{Router, routing::get};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Liveness endpoint only; the sweeper does all its work on the loop.
pub async fn start(port: u16) -> Result<()> {
    let app = Router::new()
        .fallback(default_routers::not_found)
        .route("/health-check", get(default_routers::health_check))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!("Worker server is running on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
