//! Status updates pushed by the back-office system
//!
//! Approvals, rejections and balance credits arrive as single events on the
//! webhook. Each event is applied in its own transaction.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::deposit::{DepositRequest, DepositService};
use crate::earnings::approval_instant_from_nanos;
use crate::error::ApiError;
use crate::models::RequestStatus;
use crate::profile::service::{adjust_balance, lock_balance};
use crate::withdrawal::{WithdrawalRequest, WithdrawalService};

pub const WEBHOOK_SECRET_HEADER: &str = "X-Webhook-Secret";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncEvent {
    DepositStatusChanged {
        deposit_id: Uuid,
        status: RequestStatus,
        /// Review time in nanoseconds since the Unix epoch
        timestamp_nanos: i64,
    },
    WithdrawalStatusChanged {
        withdrawal_id: Uuid,
        status: RequestStatus,
    },
    BalanceCredited {
        user_id: Uuid,
        amount: i64,
    },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncOutcome {
    Deposit(DepositRequest),
    Withdrawal(WithdrawalRequest),
    Balance { user_id: Uuid, balance: i64 },
}

/// Fail closed when no secret is configured
pub fn authorize(configured: Option<&str>, presented: Option<&str>) -> Result<(), ApiError> {
    let expected = match configured {
        Some(secret) if !secret.is_empty() => secret,
        _ => {
            tracing::error!("Webhook secret not configured, rejecting sync request");
            return Err(ApiError::ServiceUnavailable(
                "Sync webhook is not configured".to_string(),
            ));
        }
    };

    if presented != Some(expected) {
        return Err(ApiError::Unauthorized(
            "Invalid webhook secret".to_string(),
        ));
    }

    Ok(())
}

#[derive(Clone)]
pub struct SyncService {
    db_pool: PgPool,
    deposit_service: DepositService,
    withdrawal_service: WithdrawalService,
}

impl SyncService {
    pub fn new(
        db_pool: PgPool,
        deposit_service: DepositService,
        withdrawal_service: WithdrawalService,
    ) -> Self {
        Self {
            db_pool,
            deposit_service,
            withdrawal_service,
        }
    }

    pub async fn apply(&self, event: SyncEvent) -> Result<SyncOutcome, ApiError> {
        tracing::info!(event = ?event, "Applying sync event");

        match event {
            SyncEvent::DepositStatusChanged {
                deposit_id,
                status,
                timestamp_nanos,
            } => {
                let reviewed_at = approval_instant_from_nanos(timestamp_nanos).ok_or_else(|| {
                    ApiError::BadRequest(format!("Timestamp {} is out of range", timestamp_nanos))
                })?;
                let deposit = self
                    .deposit_service
                    .apply_status(deposit_id, status, reviewed_at)
                    .await?;
                Ok(SyncOutcome::Deposit(deposit))
            }
            SyncEvent::WithdrawalStatusChanged {
                withdrawal_id,
                status,
            } => {
                let withdrawal = self
                    .withdrawal_service
                    .apply_status(withdrawal_id, status)
                    .await?;
                Ok(SyncOutcome::Withdrawal(withdrawal))
            }
            SyncEvent::BalanceCredited { user_id, amount } => {
                let balance = self.credit(user_id, amount).await?;
                Ok(SyncOutcome::Balance { user_id, balance })
            }
        }
    }

    async fn credit(&self, user_id: Uuid, amount: i64) -> Result<i64, ApiError> {
        let mut tx = self.db_pool.begin().await?;
        let current = lock_balance(&mut *tx, user_id).await?;
        credited_balance(current, amount)?;
        let balance = adjust_balance(&mut *tx, user_id, amount).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user_id, amount, balance, "Balance credited");
        Ok(balance)
    }
}

/// Balance after crediting `amount`, rejecting non-positive or overflowing credits
pub fn credited_balance(balance: i64, amount: i64) -> Result<i64, ApiError> {
    if amount <= 0 {
        return Err(ApiError::ValidationError(
            "Credited amount must be positive".to_string(),
        ));
    }

    balance.checked_add(amount).ok_or_else(|| {
        ApiError::ValidationError(format!(
            "Crediting {} would overflow the balance of {}",
            amount, balance
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_authorize_fails_closed() {
        let err = authorize(None, Some("anything")).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err = authorize(Some(""), Some("")).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_authorize_checks_secret() {
        assert!(authorize(Some("s3cret"), Some("s3cret")).is_ok());

        let err = authorize(Some("s3cret"), Some("guess")).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        let err = authorize(Some("s3cret"), None).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_event_parsing() {
        let deposit_id = Uuid::new_v4();
        let raw = format!(
            r#"{{"type":"deposit_status_changed","deposit_id":"{}","status":"approved","timestamp_nanos":1700000000000000000}}"#,
            deposit_id
        );
        let event: SyncEvent = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            event,
            SyncEvent::DepositStatusChanged {
                deposit_id,
                status: RequestStatus::Approved,
                timestamp_nanos: 1_700_000_000_000_000_000,
            }
        );

        let user_id = Uuid::new_v4();
        let raw = format!(
            r#"{{"type":"balance_credited","user_id":"{}","amount":2500}}"#,
            user_id
        );
        let event: SyncEvent = serde_json::from_str(&raw).unwrap();
        assert_eq!(event, SyncEvent::BalanceCredited { user_id, amount: 2500 });
    }

    #[test]
    fn test_credited_balance_bounds() {
        assert_eq!(credited_balance(100, 50).unwrap(), 150);
        assert_eq!(credited_balance(0, i64::MAX).unwrap(), i64::MAX);

        let err = credited_balance(1, i64::MAX).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        let err = credited_balance(100, 0).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(credited_balance(100, -5).is_err());
    }

    #[test]
    fn test_unknown_event_rejected() {
        let raw = r#"{"type":"plan_deleted","plan_id":1}"#;
        assert!(serde_json::from_str::<SyncEvent>(raw).is_err());
    }
}
