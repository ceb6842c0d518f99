//! Wallet summary: available balance plus the plan currently accruing

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::deposit::{DepositService, DepositWithPlan};
use crate::earnings::AccrualSnapshot;
use crate::error::ApiError;
use crate::profile::ProfileService;

/// Latest approved deposit and its accrual as of the request
#[derive(Debug, Serialize)]
pub struct ActivePlan {
    #[serde(flatten)]
    pub deposit: DepositWithPlan,
    pub accrual: AccrualSnapshot,
    /// Every day of the plan has accrued
    pub complete: bool,
}

#[derive(Debug, Serialize)]
pub struct WalletSummary {
    pub available_balance: i64,
    pub active_plan: Option<ActivePlan>,
}

impl WalletSummary {
    pub fn build(balance: i64, latest: Option<DepositWithPlan>, now: DateTime<Utc>) -> Self {
        let active_plan = latest.and_then(|deposit| {
            let accrual = deposit.accrual_at(now)?;
            if accrual.is_before_start() {
                tracing::warn!(
                    deposit_id = %deposit.id,
                    start_date = %accrual.start_date,
                    days_elapsed = accrual.days_elapsed,
                    "Approval instant is in the future; accrual is negative"
                );
            }
            Some(ActivePlan {
                complete: accrual.is_complete(),
                deposit,
                accrual,
            })
        });

        Self {
            available_balance: balance,
            active_plan,
        }
    }
}

#[derive(Clone)]
pub struct WalletService {
    profile_service: ProfileService,
    deposit_service: DepositService,
}

impl WalletService {
    pub fn new(profile_service: ProfileService, deposit_service: DepositService) -> Self {
        Self {
            profile_service,
            deposit_service,
        }
    }

    pub async fn summary(&self, user_id: Uuid) -> Result<WalletSummary, ApiError> {
        let profile = self.profile_service.get_profile(user_id).await?;
        let latest = self.deposit_service.latest_approved(user_id).await?;
        Ok(WalletSummary::build(profile.balance, latest, Utc::now()))
    }
}
