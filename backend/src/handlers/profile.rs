//! Profile handlers

use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::models::{ApiResponse, UserRole};
use crate::profile::{ProfileView, SaveProfileRequest};
use crate::state::AppState;

/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<ProfileView>>, ApiError> {
    let view = state.profile_service.get_profile_view(user.user_id).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// PUT /api/profile - create on first save, update names and email afterwards
pub async fn save_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<SaveProfileRequest>,
) -> Result<Json<ApiResponse<ProfileView>>, ApiError> {
    let view = state
        .profile_service
        .save_profile(user.user_id, request)
        .await?;
    Ok(Json(ApiResponse::ok(view)))
}

#[derive(Debug, Serialize)]
pub struct CallerInfo {
    pub user_id: Uuid,
    pub role: UserRole,
    pub is_admin: bool,
}

/// GET /api/me - identity and role carried by the caller's token
pub async fn caller_info(user: AuthenticatedUser) -> Json<ApiResponse<CallerInfo>> {
    Json(ApiResponse::ok(CallerInfo {
        user_id: user.user_id,
        role: user.role,
        is_admin: user.is_admin(),
    }))
}
