//! Axum router wiring.
//!
//! `GET /metrics` and `GET /health`; every other path or method falls through
//! to an empty 404 (not axum's default 405 for known paths).
//!
//! axum answers HEAD from the GET handler unless a HEAD route exists, so HEAD
//! is routed to the 404 explicitly. A HEAD scrape must not merge the file.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/metrics",
            get(ops::metrics)
                .head(ops::not_found)
                .fallback(ops::not_found),
        )
        .route(
            "/health",
            get(ops::health)
                .head(ops::not_found)
                .fallback(ops::not_found),
        )
        .fallback(ops::not_found)
        .with_state(state)
}
