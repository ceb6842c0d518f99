//! Back-office sync and operational routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, sync};
use crate::state::AppState;

pub fn sync_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/api/sync/webhook", post(sync::sync_webhook))
}
