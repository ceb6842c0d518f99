//! Static operator settings: deposit account and website link

use axum::{extract::State, Json};

use crate::config::{AccountInfo, ExternalWebsite};
use crate::models::ApiResponse;
use crate::state::AppState;

/// GET /api/deposit-account
pub async fn deposit_account(State(state): State<AppState>) -> Json<ApiResponse<AccountInfo>> {
    Json(ApiResponse::ok(state.config.deposit_account.clone()))
}

/// GET /api/site
pub async fn external_website(
    State(state): State<AppState>,
) -> Json<ApiResponse<Option<ExternalWebsite>>> {
    Json(ApiResponse::ok(state.config.external_website.clone()))
}
