//! Deposit request models

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::earnings::{compute_accrued_earnings_at, AccrualSnapshot};
use crate::models::RequestStatus;
use crate::plan::Plan;

/// Stored deposit request row
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct DepositRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: i64,
    pub payment_reference: String,
    pub status: RequestStatus,
    pub submitted_at: DateTime<Utc>,
    /// Set when the request is approved; accrual starts here
    pub approved_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Deposit request joined with the plan it funds
#[derive(Debug, Serialize, sqlx::FromRow, Clone)]
pub struct DepositWithPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub payment_reference: String,
    pub status: RequestStatus,
    pub submitted_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub plan: Plan,
}

impl DepositWithPlan {
    /// Accrual as of `now`; `None` until the request is approved
    pub fn accrual_at(&self, now: DateTime<Utc>) -> Option<AccrualSnapshot> {
        if self.status != RequestStatus::Approved {
            return None;
        }
        let approved_at = self.approved_at?;
        Some(compute_accrued_earnings_at(
            approved_at,
            self.plan.duration_days,
            self.plan.daily_profit,
            now,
        ))
    }
}

/// Payload for submitting a deposit request
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitDepositRequest {
    #[validate(range(min = 1))]
    pub plan_id: i64,
    /// Identifier of the payment proof (transaction id or receipt link)
    #[validate(length(min = 1, max = 512))]
    pub payment_reference: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::sample_plan;
    use chrono::Duration;

    fn deposit(status: RequestStatus, approved_at: Option<DateTime<Utc>>) -> DepositWithPlan {
        let now = Utc::now();
        DepositWithPlan {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            payment_reference: "TXN-1".to_string(),
            status,
            submitted_at: now,
            approved_at,
            updated_at: now,
            plan: sample_plan(1, 1000, 50, 30),
        }
    }

    #[test]
    fn test_accrual_requires_approval() {
        let now = Utc::now();
        assert!(deposit(RequestStatus::Pending, None).accrual_at(now).is_none());
        assert!(deposit(RequestStatus::Rejected, Some(now)).accrual_at(now).is_none());
        // Approved but missing timestamp is treated as not started
        assert!(deposit(RequestStatus::Approved, None).accrual_at(now).is_none());
    }

    #[test]
    fn test_accrual_uses_plan_terms() {
        let approved_at = Utc::now() - Duration::days(40);
        let snapshot = deposit(RequestStatus::Approved, Some(approved_at))
            .accrual_at(approved_at + Duration::days(4) + Duration::hours(3))
            .unwrap();
        assert_eq!(snapshot.days_elapsed, 4);
        assert_eq!(snapshot.accrued_earnings, 200);
    }

    #[test]
    fn test_submit_validation() {
        let ok = SubmitDepositRequest {
            plan_id: 1,
            payment_reference: "EP-99812".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = SubmitDepositRequest {
            plan_id: 0,
            payment_reference: String::new(),
        };
        assert!(bad.validate().is_err());
    }
}
