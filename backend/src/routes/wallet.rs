//! Wallet and referral routes

use axum::{routing::get, Router};

use crate::handlers::{referral, wallet};
use crate::state::AppState;

pub fn wallet_routes() -> Router<AppState> {
    Router::new()
        .route("/api/wallet", get(wallet::wallet_summary))
        .route("/api/referrals", get(referral::referral_overview))
        .route("/api/referrals/tiers", get(referral::referral_tiers))
}
