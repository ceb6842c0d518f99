//! Referral progress against the configured bonus tiers

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::ReferralTier;
use crate::error::ApiError;
use crate::models::RequestStatus;
use crate::profile::ProfileService;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TierProgress {
    pub required_referrals: i64,
    pub bonus: i64,
    pub earned: bool,
}

#[derive(Debug, Serialize)]
pub struct ReferralOverview {
    pub referral_code: String,
    pub total_referrals: i64,
    /// Referred users with at least one approved deposit
    pub active_referrals: i64,
    pub tiers: Vec<TierProgress>,
}

/// Mark each tier earned once `active_referrals` reaches its requirement
pub fn tier_progress(tiers: &[ReferralTier], active_referrals: i64) -> Vec<TierProgress> {
    tiers
        .iter()
        .map(|tier| TierProgress {
            required_referrals: tier.required_referrals,
            bonus: tier.bonus,
            earned: active_referrals >= tier.required_referrals,
        })
        .collect()
}

#[derive(Clone)]
pub struct ReferralService {
    db_pool: PgPool,
    profile_service: ProfileService,
    tiers: Vec<ReferralTier>,
}

impl ReferralService {
    pub fn new(db_pool: PgPool, profile_service: ProfileService, tiers: Vec<ReferralTier>) -> Self {
        Self {
            db_pool,
            profile_service,
            tiers,
        }
    }

    pub fn tiers(&self) -> &[ReferralTier] {
        &self.tiers
    }

    pub async fn overview(&self, user_id: Uuid) -> Result<ReferralOverview, ApiError> {
        let profile = self.profile_service.get_profile(user_id).await?;

        let (total_referrals, active_referrals): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE EXISTS (
                    SELECT 1 FROM deposit_requests d
                    WHERE d.user_id = u.user_id AND d.status = $2
                ))
            FROM user_profiles u
            WHERE u.referred_by = $1
            "#,
        )
        .bind(&profile.referral_code)
        .bind(RequestStatus::Approved)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::debug!(
            user_id = %user_id,
            total_referrals,
            active_referrals,
            "Referral overview computed"
        );

        Ok(ReferralOverview {
            referral_code: profile.referral_code,
            total_referrals,
            active_referrals,
            tiers: tier_progress(&self.tiers, active_referrals),
        })
    }
}
