//! Request tracing middleware

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use super::rate_limiter::{forwarded_ip, peer_ip};

/// Log every request with its outcome and latency inside a per-request span
pub async fn request_tracing(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client = peer_ip(&request).unwrap_or_else(|| "unknown".to_string());
    let forwarded_for = forwarded_ip(&request);

    let span = tracing::info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %method,
        path = %path,
    );

    async move {
        let start = Instant::now();
        tracing::debug!(client_ip = %client, forwarded_for = ?forwarded_for, "Request started");

        let response = next.run(request).await;

        let status = response.status().as_u16();
        let duration_ms = start.elapsed().as_millis() as u64;

        if response.status().is_server_error() {
            tracing::error!(status, duration_ms, client_ip = %client, "Request failed");
        } else if response.status().is_client_error() {
            tracing::warn!(status, duration_ms, client_ip = %client, "Request rejected");
        } else {
            tracing::info!(status, duration_ms, client_ip = %client, "Request completed");
        }

        response
    }
    .instrument(span)
    .await
}
