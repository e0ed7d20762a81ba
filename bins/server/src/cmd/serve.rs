use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use lastseen_api::RecordSource;
use lastseen_api_server::AppState;
use lastseen_engine::{EventResolver, Measures};
use storage_memory::MemoryRecordSource;

use crate::config::{ServeArgs, ServerConfig};
use crate::error::ServerError;
use crate::observability;

const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

async fn bind(port: u16) -> Result<TcpListener, ServerError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Listen { addr, source })
}

pub async fn run(args: ServeArgs) -> Result<(), ServerError> {
    tracing::info!("lastseen-server starting");

    // --- Load config ---
    let config = ServerConfig::load(&args.config)?;
    tracing::info!(config = %args.config, get_limit = config.get_limit, "loaded config");

    // --- Metrics: recorder first, then handles ---
    let metrics_handle = observability::install_metrics_recorder()?;
    let measures = Measures::register();

    // --- Record source ---
    let storage = MemoryRecordSource::from_config(&config.storage).await?;
    tracing::info!(
        max_records = config.storage.max_records,
        records = storage.len().await,
        "memory storage ready"
    );
    let source: Arc<dyn RecordSource> = Arc::new(storage);

    let state = AppState {
        resolver: Arc::new(EventResolver::new(source, measures)),
        get_limit: config.get_limit,
    };

    // --- CancellationToken for graceful shutdown ---
    let token = CancellationToken::new();
    let mut handles: Vec<JoinHandle<()>> = Vec::new();

    // --- Metrics listener ---
    if let Some(port) = config.metrics_port {
        let listener = bind(port).await?;
        let shutdown = token.clone().cancelled_owned();
        handles.push(tokio::spawn(async move {
            if let Err(e) = observability::serve_metrics(metrics_handle, listener, shutdown).await {
                tracing::error!(error = %e, "metrics server error");
            }
        }));
        tracing::info!(port, "metrics listening");
    }

    // --- API server ---
    let listener = bind(config.api_port).await?;
    let api_token = token.clone();
    handles.push(tokio::spawn(async move {
        if let Err(e) = lastseen_api_server::run(listener, state, api_token).await {
            tracing::error!(error = %e, "api server error");
        }
    }));

    tracing::info!(port = config.api_port, "server ready");

    // --- Wait for Ctrl+C ---
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down...");
    token.cancel();

    for h in handles {
        let abort = h.abort_handle();
        if tokio::time::timeout(DRAIN_TIMEOUT, h).await.is_err() {
            tracing::warn!("task did not drain in time, aborting");
            abort.abort();
        }
    }

    tracing::info!("shutdown complete");
    Ok(())
}
