//! HTTP query surface over the observation store.
//!
//! Read-only: one route returning the accumulated series for a location.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use common::normalize_key;
use observation_store::ObservationStore;
use std::sync::Arc;
use tracing::info;

pub fn router(store: Arc<ObservationStore>) -> Router {
    Router::new()
        .route("/{city}", get(read_series))
        .with_state(store)
}

/// `GET /{city}` — the full series for a location, oldest reading first.
///
/// The path parameter is normalized the same way the configured city is, so
/// `/Moscow` and `/moscow` name the same series.
async fn read_series(
    State(store): State<Arc<ObservationStore>>,
    Path(city): Path<String>,
) -> Response {
    let key = normalize_key(&city);
    info!("Series requested for {}", key);

    match store.read(&key).await {
        Some(series) => Json(series).into_response(),
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}
