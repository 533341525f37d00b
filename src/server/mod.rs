// src/server/mod.rs

//! HTTP surface.
//!
//! - `POST /run` with `{"url": "..."}` runs one scan and answers once it
//!   has finished, timed out or failed.
//! - `GET /health` reports admission queue usage.

pub mod handlers;

use std::future::Future;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tracing::info;

pub use handlers::{AppState, ErrorResponse, HealthResponse, MessageResponse, RunRequest};

/// Build the application router around a shared pipeline.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/run", post(handlers::run_scan))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "scanqueue listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
