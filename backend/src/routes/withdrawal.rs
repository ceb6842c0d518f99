//! Withdrawal routes

use axum::{routing::get, Router};

use crate::handlers::withdrawal;
use crate::state::AppState;

pub fn withdrawal_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/withdrawals",
            get(withdrawal::list_withdrawals).post(withdrawal::submit_withdrawal),
        )
        .route("/api/withdrawals/limits", get(withdrawal::withdrawal_limits))
        .route(
            "/api/withdrawals/eligibility",
            get(withdrawal::withdrawal_eligibility),
        )
}
