//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::JwtSecret;
use crate::config::Config;
use crate::deposit::DepositService;
use crate::plan::PlanService;
use crate::profile::ProfileService;
use crate::referral::ReferralService;
use crate::sync::SyncService;
use crate::wallet::WalletService;
use crate::withdrawal::{WithdrawalLimits, WithdrawalService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: PgPool,
    pub jwt_secret: JwtSecret,
    pub plan_service: PlanService,
    pub profile_service: ProfileService,
    pub deposit_service: DepositService,
    pub withdrawal_service: WithdrawalService,
    pub wallet_service: WalletService,
    pub referral_service: ReferralService,
    pub sync_service: SyncService,
}

impl AppState {
    /// Wire every service onto one pool
    pub fn new(config: Config, db_pool: PgPool) -> Self {
        let plan_service = PlanService::new(db_pool.clone());
        let profile_service = ProfileService::new(db_pool.clone());
        let deposit_service = DepositService::new(
            db_pool.clone(),
            plan_service.clone(),
            profile_service.clone(),
        );
        let withdrawal_service = WithdrawalService::new(
            db_pool.clone(),
            profile_service.clone(),
            WithdrawalLimits {
                min: config.min_withdrawal,
                max: config.max_withdrawal,
            },
        );
        let wallet_service = WalletService::new(profile_service.clone(), deposit_service.clone());
        let referral_service = ReferralService::new(
            db_pool.clone(),
            profile_service.clone(),
            config.referral_tiers.clone(),
        );
        let sync_service = SyncService::new(
            db_pool.clone(),
            deposit_service.clone(),
            withdrawal_service.clone(),
        );

        Self {
            jwt_secret: JwtSecret::new(&config.jwt_secret),
            config: Arc::new(config),
            db_pool,
            plan_service,
            profile_service,
            deposit_service,
            withdrawal_service,
            wallet_service,
            referral_service,
            sync_service,
        }
    }
}

impl FromRef<AppState> for JwtSecret {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.jwt_secret.clone()
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
