//! Deposit request routes

use axum::{routing::get, Router};

use crate::handlers::deposit;
use crate::state::AppState;

pub fn deposit_routes() -> Router<AppState> {
    Router::new().route(
        "/api/deposits",
        get(deposit::list_deposits).post(deposit::submit_deposit),
    )
}
