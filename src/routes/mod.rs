// HTTP routes

mod http;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

use crate::aggregator::SnapshotAggregator;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) aggregator: SnapshotAggregator,
}

pub fn app(aggregator: SnapshotAggregator) -> Router {
    let state = AppState { aggregator };
    Router::new()
        .route("/", get(http::dashboard_handler)) // GET /
        .route("/api/snapshot", get(http::snapshot_handler)) // GET /api/snapshot
        .route("/version", get(http::version_handler)) // GET /version
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
