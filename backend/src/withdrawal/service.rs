//! Withdrawal service - validated submission against the caller's balance

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::RequestStatus;
use crate::profile::service::{adjust_balance, lock_balance};
use crate::profile::ProfileService;
use crate::withdrawal::model::{
    ensure_covered, SubmitWithdrawalRequest, WithdrawalLimits, WithdrawalRequest,
};

#[derive(Clone)]
pub struct WithdrawalService {
    db_pool: PgPool,
    profile_service: ProfileService,
    limits: WithdrawalLimits,
}

impl WithdrawalService {
    pub fn new(db_pool: PgPool, profile_service: ProfileService, limits: WithdrawalLimits) -> Self {
        Self {
            db_pool,
            profile_service,
            limits,
        }
    }

    pub fn limits(&self) -> WithdrawalLimits {
        self.limits
    }

    /// Whether the caller's balance reaches the minimum withdrawal.
    /// A caller without a profile has nothing to withdraw.
    pub async fn can_withdraw(&self, user_id: Uuid) -> Result<bool, ApiError> {
        let balance = self
            .profile_service
            .find_profile(user_id)
            .await?
            .map(|p| p.balance)
            .unwrap_or(0);

        Ok(self.limits.allows_withdrawal_from(balance))
    }

    /// Validate and record a withdrawal, debiting the balance in the same transaction
    pub async fn submit(
        &self,
        user_id: Uuid,
        request: SubmitWithdrawalRequest,
    ) -> Result<WithdrawalRequest, ApiError> {
        self.limits.check(request.amount, &request.account_number)?;
        let account_number = request.account_number.trim().to_string();

        let mut tx = self.db_pool.begin().await?;

        let balance = lock_balance(&mut *tx, user_id).await?;
        ensure_covered(request.amount, balance)?;
        let remaining = adjust_balance(&mut *tx, user_id, -request.amount).await?;

        let now = Utc::now();
        let withdrawal = sqlx::query_as::<_, WithdrawalRequest>(
            r#"
            INSERT INTO withdrawal_requests (
                id, user_id, account_number, amount, payout_method,
                status, submitted_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&account_number)
        .bind(request.amount)
        .bind(request.payout_method)
        .bind(RequestStatus::Pending)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            withdrawal_id = %withdrawal.id,
            user_id = %user_id,
            amount = withdrawal.amount,
            payout_method = ?withdrawal.payout_method,
            remaining_balance = remaining,
            "Withdrawal request submitted"
        );

        Ok(withdrawal)
    }

    /// Caller's withdrawal requests, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<WithdrawalRequest>, ApiError> {
        let withdrawals = sqlx::query_as::<_, WithdrawalRequest>(
            "SELECT * FROM withdrawal_requests WHERE user_id = $1 ORDER BY submitted_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(withdrawals)
    }

    /// Settle a pending withdrawal. Rejection returns the amount to the balance.
    pub async fn apply_status(
        &self,
        withdrawal_id: Uuid,
        status: RequestStatus,
    ) -> Result<WithdrawalRequest, ApiError> {
        let mut tx = self.db_pool.begin().await?;

        let current = sqlx::query_as::<_, WithdrawalRequest>(
            "SELECT * FROM withdrawal_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(withdrawal_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Withdrawal request {} not found", withdrawal_id))
        })?;

        if !current.status.can_transition_to(status) {
            return Err(ApiError::Conflict(format!(
                "Withdrawal request {} cannot move from {:?} to {:?}",
                withdrawal_id, current.status, status
            )));
        }

        let updated = sqlx::query_as::<_, WithdrawalRequest>(
            r#"
            UPDATE withdrawal_requests
            SET status = $1, updated_at = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(Utc::now())
        .bind(withdrawal_id)
        .fetch_one(&mut *tx)
        .await?;

        if status == RequestStatus::Rejected {
            let balance = adjust_balance(&mut *tx, updated.user_id, updated.amount).await?;
            tracing::info!(
                withdrawal_id = %withdrawal_id,
                user_id = %updated.user_id,
                refunded = updated.amount,
                balance,
                "Rejected withdrawal refunded"
            );
        }

        tx.commit().await?;

        tracing::info!(
            withdrawal_id = %withdrawal_id,
            status = ?updated.status,
            "Withdrawal request status changed"
        );

        Ok(updated)
    }
}
