//! Back-office status sync webhook

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};

use crate::error::ApiError;
use crate::models::ApiResponse;
use crate::state::AppState;
use crate::sync::{authorize, SyncEvent, SyncOutcome, WEBHOOK_SECRET_HEADER};

/// POST /api/sync/webhook
///
/// The secret is checked before the body is parsed.
pub async fn sync_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<SyncOutcome>>, ApiError> {
    let presented = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|h| h.to_str().ok());
    authorize(state.config.webhook_secret.as_deref(), presented)?;

    let event: SyncEvent = serde_json::from_slice(&body)?;
    let outcome = state.sync_service.apply(event).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}
