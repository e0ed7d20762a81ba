//! HTTP surface of the last-known-status service.
//!
//! Routes:
//! - `GET /{device_id}/status`: newest live event, 200 / 404 / 500
//! - `GET /{device_id}/events`: every live event in the lookback window
//! - `GET /health`: liveness

mod error;
mod http;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use lastseen_engine::EventResolver;

pub use error::ApiError;

/// Shared by every request; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<EventResolver>,
    /// Records fetched per lookup. Fixed per process.
    pub get_limit: usize,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handle_health))
        .route("/{device_id}/status", get(http::handle_get_status))
        .route("/{device_id}/events", get(http::handle_get_events))
        .with_state(state)
}

/// Serve the API on an already bound listener until `shutdown` fires.
pub async fn run(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    tracing::info!(addr = %listener.local_addr()?, "api server listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
}
