//! Investment plan models

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};

/// Fixed-term investment offer
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq, Eq)]
pub struct Plan {
    pub plan_id: i64,
    pub deposit_amount: i64,
    pub daily_profit: i64,
    pub duration_days: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Plan {
    /// Profit paid out over the full duration
    pub fn total_return(&self) -> i64 {
        self.daily_profit.saturating_mul(self.duration_days)
    }

    /// Total return as a whole percentage of the deposit, 0 for free plans
    pub fn roi_percent(&self) -> i64 {
        if self.deposit_amount <= 0 {
            return 0;
        }
        let pct = self.total_return() as f64 / self.deposit_amount as f64 * 100.0;
        pct.round() as i64
    }
}

/// Plan as listed to clients, with derived figures
#[derive(Debug, Serialize, Clone)]
pub struct PlanView {
    #[serde(flatten)]
    pub plan: Plan,
    pub total_return: i64,
    pub roi_percent: i64,
}

impl From<Plan> for PlanView {
    fn from(plan: Plan) -> Self {
        Self {
            total_return: plan.total_return(),
            roi_percent: plan.roi_percent(),
            plan,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_plan(plan_id: i64, deposit_amount: i64, daily_profit: i64, duration_days: i64) -> Plan {
    Plan {
        plan_id,
        deposit_amount,
        daily_profit,
        duration_days,
        is_active: true,
        created_at: Utc::now(),
    }
}
