//! Deposit service layer - submission, listing and status changes

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::deposit::model::{DepositRequest, DepositWithPlan, SubmitDepositRequest};
use crate::error::ApiError;
use crate::models::RequestStatus;
use crate::plan::PlanService;
use crate::profile::ProfileService;

const SELECT_WITH_PLAN: &str = r#"
    SELECT
        d.id, d.user_id, d.payment_reference, d.status,
        d.submitted_at, d.approved_at, d.updated_at,
        p.plan_id, p.deposit_amount, p.daily_profit, p.duration_days,
        p.is_active, p.created_at
    FROM deposit_requests d
    JOIN plans p ON p.plan_id = d.plan_id
"#;

#[derive(Clone)]
pub struct DepositService {
    db_pool: PgPool,
    plan_service: PlanService,
    profile_service: ProfileService,
}

impl DepositService {
    pub fn new(db_pool: PgPool, plan_service: PlanService, profile_service: ProfileService) -> Self {
        Self {
            db_pool,
            plan_service,
            profile_service,
        }
    }

    /// Record a pending deposit request against an active plan
    pub async fn submit(
        &self,
        user_id: Uuid,
        mut request: SubmitDepositRequest,
    ) -> Result<DepositWithPlan, ApiError> {
        request.payment_reference = request.payment_reference.trim().to_string();
        request.validate()?;

        self.profile_service.get_profile(user_id).await?;
        let plan = self.plan_service.get_active_plan(request.plan_id).await?;

        let pending: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM deposit_requests WHERE user_id = $1 AND status = $2)",
        )
        .bind(user_id)
        .bind(RequestStatus::Pending)
        .fetch_one(&self.db_pool)
        .await?;

        if pending {
            return Err(ApiError::Conflict(
                "A deposit request is already awaiting review".to_string(),
            ));
        }

        let now = Utc::now();
        let deposit = sqlx::query_as::<_, DepositRequest>(
            r#"
            INSERT INTO deposit_requests (
                id, user_id, plan_id, payment_reference, status,
                submitted_at, approved_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, NULL, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(plan.plan_id)
        .bind(&request.payment_reference)
        .bind(RequestStatus::Pending)
        .bind(now)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(
            deposit_id = %deposit.id,
            user_id = %user_id,
            plan_id = plan.plan_id,
            amount = plan.deposit_amount,
            "Deposit request submitted"
        );

        Ok(DepositWithPlan {
            id: deposit.id,
            user_id: deposit.user_id,
            payment_reference: deposit.payment_reference,
            status: deposit.status,
            submitted_at: deposit.submitted_at,
            approved_at: deposit.approved_at,
            updated_at: deposit.updated_at,
            plan,
        })
    }

    /// Caller's deposit requests, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<DepositWithPlan>, ApiError> {
        let query = format!("{} WHERE d.user_id = $1 ORDER BY d.submitted_at DESC", SELECT_WITH_PLAN);
        let deposits = sqlx::query_as::<_, DepositWithPlan>(&query)
            .bind(user_id)
            .fetch_all(&self.db_pool)
            .await?;

        Ok(deposits)
    }

    /// Most recently approved deposit, the one currently accruing
    pub async fn latest_approved(&self, user_id: Uuid) -> Result<Option<DepositWithPlan>, ApiError> {
        let query = format!(
            "{} WHERE d.user_id = $1 AND d.status = $2 ORDER BY d.approved_at DESC NULLS LAST LIMIT 1",
            SELECT_WITH_PLAN
        );
        let deposit = sqlx::query_as::<_, DepositWithPlan>(&query)
            .bind(user_id)
            .bind(RequestStatus::Approved)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(deposit)
    }

    /// Move a pending request to approved or rejected.
    ///
    /// `approved_at` is stored only for approvals.
    pub async fn apply_status(
        &self,
        deposit_id: Uuid,
        status: RequestStatus,
        approved_at: DateTime<Utc>,
    ) -> Result<DepositRequest, ApiError> {
        let mut tx = self.db_pool.begin().await?;

        let current = sqlx::query_as::<_, DepositRequest>(
            "SELECT * FROM deposit_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(deposit_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Deposit request {} not found", deposit_id)))?;

        if !current.status.can_transition_to(status) {
            return Err(ApiError::Conflict(format!(
                "Deposit request {} cannot move from {:?} to {:?}",
                deposit_id, current.status, status
            )));
        }

        let approved_at = (status == RequestStatus::Approved).then_some(approved_at);

        let updated = sqlx::query_as::<_, DepositRequest>(
            r#"
            UPDATE deposit_requests
            SET status = $1, approved_at = $2, updated_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(approved_at)
        .bind(Utc::now())
        .bind(deposit_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            deposit_id = %deposit_id,
            user_id = %updated.user_id,
            status = ?updated.status,
            approved_at = ?updated.approved_at,
            "Deposit request status changed"
        );

        Ok(updated)
    }
}
