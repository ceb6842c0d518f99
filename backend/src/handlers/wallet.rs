//! Wallet summary handler

use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::models::ApiResponse;
use crate::state::AppState;
use crate::wallet::WalletSummary;

/// GET /api/wallet - balance and the plan currently accruing
pub async fn wallet_summary(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<WalletSummary>>, ApiError> {
    let summary = state.wallet_service.summary(user.user_id).await?;
    Ok(Json(ApiResponse::ok(summary)))
}
