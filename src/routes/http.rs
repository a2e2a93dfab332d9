// GET handlers: dashboard, snapshot JSON, version

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};

use super::AppState;
use crate::presenter;
use crate::version::{NAME, VERSION};

/// GET / — rendered dashboard. 200 whatever the source states; 500 only if rendering fails.
pub(super) async fn dashboard_handler(State(state): State<AppState>) -> Response {
    let snapshot = state.aggregator.build_snapshot().await;
    match presenter::render_html(&snapshot) {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_failure("render_html", e),
    }
}

/// GET /api/snapshot — the snapshot as JSON for headless consumers.
pub(super) async fn snapshot_handler(State(state): State<AppState>) -> Response {
    let snapshot = state.aggregator.build_snapshot().await;
    match serde_json::to_string(&snapshot) {
        Ok(json) => ([(header::CONTENT_TYPE, "application/json")], json).into_response(),
        Err(e) => render_failure("serialize_snapshot", e),
    }
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

fn render_failure(operation: &'static str, e: impl std::fmt::Display) -> Response {
    tracing::error!(error = %e, operation, "snapshot rendering failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("failed to render snapshot: {}", e),
    )
        .into_response()
}
