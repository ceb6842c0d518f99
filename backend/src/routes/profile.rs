//! Profile routes

use axum::{routing::get, Router};

use crate::handlers::profile;
use crate::state::AppState;

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/api/me", get(profile::caller_info))
        .route(
            "/api/profile",
            get(profile::get_profile).put(profile::save_profile),
        )
}
