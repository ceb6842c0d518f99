//! Deposit request handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::deposit::{DepositWithPlan, SubmitDepositRequest};
use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::models::ApiResponse;
use crate::state::AppState;

/// POST /api/deposits
pub async fn submit_deposit(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<SubmitDepositRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DepositWithPlan>>), ApiError> {
    let deposit = state.deposit_service.submit(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(deposit))))
}

/// GET /api/deposits
pub async fn list_deposits(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<Vec<DepositWithPlan>>>, ApiError> {
    let deposits = state.deposit_service.list_for_user(user.user_id).await?;
    Ok(Json(ApiResponse::ok(deposits)))
}
