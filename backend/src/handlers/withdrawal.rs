//! Withdrawal handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::models::ApiResponse;
use crate::state::AppState;
use crate::withdrawal::{
    SubmitWithdrawalRequest, WithdrawalEligibility, WithdrawalLimits, WithdrawalRequest,
};

/// GET /api/withdrawals/limits
pub async fn withdrawal_limits(
    State(state): State<AppState>,
) -> Json<ApiResponse<WithdrawalLimits>> {
    Json(ApiResponse::ok(state.withdrawal_service.limits()))
}

/// GET /api/withdrawals/eligibility
pub async fn withdrawal_eligibility(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<WithdrawalEligibility>>, ApiError> {
    let can_withdraw = state.withdrawal_service.can_withdraw(user.user_id).await?;
    Ok(Json(ApiResponse::ok(WithdrawalEligibility { can_withdraw })))
}

/// POST /api/withdrawals
pub async fn submit_withdrawal(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<SubmitWithdrawalRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WithdrawalRequest>>), ApiError> {
    let withdrawal = state
        .withdrawal_service
        .submit(user.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(withdrawal))))
}

/// GET /api/withdrawals
pub async fn list_withdrawals(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<Vec<WithdrawalRequest>>>, ApiError> {
    let withdrawals = state.withdrawal_service.list_for_user(user.user_id).await?;
    Ok(Json(ApiResponse::ok(withdrawals)))
}
