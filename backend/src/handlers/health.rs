//! Operational endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::db;
use crate::state::AppState;

pub async fn root() -> &'static str {
    "Planvest API Server"
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: db::DbHealth,
    pub version: &'static str,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = db::probe(&state.db_pool).await;

    Json(HealthResponse {
        status: if database.connected { "healthy" } else { "unhealthy" },
        database,
        version: env!("CARGO_PKG_VERSION"),
    })
}
