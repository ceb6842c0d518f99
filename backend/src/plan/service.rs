use sqlx::PgPool;

use crate::error::ApiError;
use crate::plan::model::Plan;

/// Read access to the plan catalogue
#[derive(Clone)]
pub struct PlanService {
    db_pool: PgPool,
}

impl PlanService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    pub async fn list_available(&self) -> Result<Vec<Plan>, ApiError> {
        let plans = sqlx::query_as::<_, Plan>(
            "SELECT * FROM plans WHERE is_active = TRUE ORDER BY plan_id",
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(plans)
    }

    pub async fn get_plan(&self, plan_id: i64) -> Result<Plan, ApiError> {
        sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE plan_id = $1")
            .bind(plan_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Plan {} not found", plan_id)))
    }

    /// Like `get_plan`, but withdrawn plans are treated as missing
    pub async fn get_active_plan(&self, plan_id: i64) -> Result<Plan, ApiError> {
        let plan = self.get_plan(plan_id).await?;
        if !plan.is_active {
            return Err(ApiError::NotFound(format!(
                "Plan {} is no longer available",
                plan_id
            )));
        }
        Ok(plan)
    }
}
