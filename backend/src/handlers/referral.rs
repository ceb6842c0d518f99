//! Referral handlers

use axum::{extract::State, Json};

use crate::config::ReferralTier;
use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::models::ApiResponse;
use crate::referral::ReferralOverview;
use crate::state::AppState;

/// GET /api/referrals/tiers
pub async fn referral_tiers(State(state): State<AppState>) -> Json<ApiResponse<Vec<ReferralTier>>> {
    Json(ApiResponse::ok(state.referral_service.tiers().to_vec()))
}

/// GET /api/referrals
pub async fn referral_overview(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<ReferralOverview>>, ApiError> {
    let overview = state.referral_service.overview(user.user_id).await?;
    Ok(Json(ApiResponse::ok(overview)))
}
