//! Plan catalogue handlers

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::ApiError;
use crate::models::ApiResponse;
use crate::plan::PlanView;
use crate::state::AppState;

/// GET /api/plans
pub async fn list_plans(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PlanView>>>, ApiError> {
    let plans = state.plan_service.list_available().await?;
    Ok(Json(ApiResponse::ok(
        plans.into_iter().map(PlanView::from).collect(),
    )))
}

/// GET /api/plans/:id
pub async fn get_plan(
    State(state): State<AppState>,
    Path(plan_id): Path<i64>,
) -> Result<Json<ApiResponse<PlanView>>, ApiError> {
    let plan = state.plan_service.get_plan(plan_id).await?;
    Ok(Json(ApiResponse::ok(plan.into())))
}
