//! Plan catalogue and operator settings routes

use axum::{routing::get, Router};

use crate::handlers::{plan, site};
use crate::state::AppState;

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/api/plans", get(plan::list_plans))
        .route("/api/plans/:id", get(plan::get_plan))
        .route("/api/deposit-account", get(site::deposit_account))
        .route("/api/site", get(site::external_website))
}
