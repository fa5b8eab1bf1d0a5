//! Operational HTTP endpoints.
//!
//! - `/metrics` : Prometheus text format, refreshed from the snapshot file
//! - `/health`  : liveness, never touches the store
//!
//! Nothing here logs per request; scrapers poll every few seconds.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use ats_metrics_core::exposition;

use crate::app_state::AppState;

pub const HEALTH_BODY: &str = r#"{"status": "healthy"}"#;

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.store().scrape();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, exposition::CONTENT_TYPE)],
        body,
    )
        .into_response()
}

pub async fn health() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        HEALTH_BODY,
    )
        .into_response()
}

/// Unknown paths and unsupported methods: 404 with an empty body.
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
