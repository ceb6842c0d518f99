//! Route definitions for the Planvest API

mod deposit;
mod plan;
mod profile;
mod sync;
mod wallet;
mod withdrawal;

use axum::{middleware, Router};

use crate::middleware::{rate_limit, request_tracing, security_headers, RateLimiter};
use crate::state::AppState;

pub use deposit::deposit_routes;
pub use plan::plan_routes;
pub use profile::profile_routes;
pub use sync::sync_routes;
pub use wallet::wallet_routes;
pub use withdrawal::withdrawal_routes;

/// Every route with state, security headers, request tracing and rate limiting
pub fn app_router(state: AppState, rate_limiter: RateLimiter) -> Router {
    Router::new()
        .merge(plan_routes())
        .merge(profile_routes())
        .merge(deposit_routes())
        .merge(withdrawal_routes())
        .merge(wallet_routes())
        .merge(sync_routes())
        .with_state(state)
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_tracing))
        .layer(middleware::from_fn_with_state(rate_limiter, rate_limit))
}
