//! Prometheus exposition for the process-wide `metrics` recorder.
//!
//! The recorder must be installed before any counter is registered, or the
//! handles end up bound to the no-op recorder.
use std::future::Future;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::net::TcpListener;

use crate::error::ServerError;

pub fn install_metrics_recorder() -> Result<PrometheusHandle, ServerError> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Metrics(e.to_string()))
}

fn metrics_router(handle: PrometheusHandle) -> axum::Router {
    axum::Router::new().route(
        "/metrics",
        axum::routing::get(move || async move { handle.render() }),
    )
}

pub async fn serve_metrics<F>(
    handle: PrometheusHandle,
    listener: TcpListener,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, metrics_router(handle))
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use lastseen_api::{Record, now_secs};
    use lastseen_engine::{EventResolver, Measures, ResolveError, UNMARSHAL_FAILURE_COUNTER};
    use storage_memory::MemoryRecordSource;
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn metrics_endpoint_renders_failure_counter() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let measures = metrics::with_local_recorder(&recorder, Measures::register);

        let source = Arc::new(MemoryRecordSource::new(10));
        source
            .insert(Record {
                id: 1,
                device_id: "mac:1".into(),
                birth_date: now_secs(),
                death_date: now_secs() + 1000,
                data: b"\"\"".to_vec(),
            })
            .await;
        let resolver = EventResolver::new(source, measures);
        let err = resolver.resolve("mac:1", 5, &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, ResolveError::NoRecords));

        let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
        let response = metrics_router(handle).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains(&format!("{UNMARSHAL_FAILURE_COUNTER} 1")));
    }
}
