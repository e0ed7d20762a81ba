use axum::extract::{Path, State};
use axum::Json;
use tokio_util::sync::CancellationToken;

use lastseen_api::Event;
use lastseen_engine::ResolveError;

use super::AppState;
use crate::error::ApiError;

// ═══════════════════════════════════════════════════════════════
//  REST: GET /{device_id}/status
// ═══════════════════════════════════════════════════════════════

pub(crate) async fn handle_get_status(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    if device_id.is_empty() {
        return Err(ResolveError::NoRecords.into());
    }

    // Dropping the handler future (client gone, shutdown) cancels the query.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let event = state
        .resolver
        .resolve(&device_id, state.get_limit, &cancel)
        .await?;
    tracing::debug!(device_id = %device_id, event_id = event.id, "status served");
    Ok(Json(event))
}

// ═══════════════════════════════════════════════════════════════
//  REST: GET /{device_id}/events
// ═══════════════════════════════════════════════════════════════

pub(crate) async fn handle_get_events(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<Json<Vec<Event>>, ApiError> {
    if device_id.is_empty() {
        return Err(ResolveError::NoRecords.into());
    }

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let events = state
        .resolver
        .resolve_all(&device_id, state.get_limit, &cancel)
        .await?;
    tracing::debug!(device_id = %device_id, count = events.len(), "events served");
    Ok(Json(events))
}

// ═══════════════════════════════════════════════════════════════
//  GET /health
// ═══════════════════════════════════════════════════════════════

pub(crate) async fn handle_health() -> &'static str {
    "ok"
}
