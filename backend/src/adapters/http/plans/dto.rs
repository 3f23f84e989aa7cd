//! HTTP DTOs for plan endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::plan::{BillingInterval, Plan, UserPlan, UserPlanStatus};

/// Query for `GET /plans/`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PlanListQuery {
    /// Defaults to `true`.
    pub active_only: Option<bool>,
}

impl PlanListQuery {
    pub fn active_only(&self) -> bool {
        self.active_only.unwrap_or(true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub currency: String,
    pub interval: BillingInterval,
    pub stripe_price_id: Option<String>,
    pub features: Vec<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Plan> for PlanResponse {
    fn from(plan: Plan) -> Self {
        Self {
            id: plan.id.as_i64(),
            name: plan.name,
            description: plan.description,
            price_cents: plan.price_cents,
            currency: plan.currency,
            interval: plan.interval,
            stripe_price_id: plan.stripe_price_id,
            features: plan.features,
            is_active: plan.is_active,
            created_at: plan.created_at.to_rfc3339(),
            updated_at: plan.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserPlanResponse {
    pub id: i64,
    pub user_id: i64,
    pub plan_id: i64,
    pub status: UserPlanStatus,
    pub started_at: String,
    pub cancelled_at: Option<String>,
}

impl From<UserPlan> for UserPlanResponse {
    fn from(user_plan: UserPlan) -> Self {
        Self {
            id: user_plan.id.as_i64(),
            user_id: user_plan.user_id.as_i64(),
            plan_id: user_plan.plan_id.as_i64(),
            status: user_plan.status,
            started_at: user_plan.started_at.to_rfc3339(),
            cancelled_at: user_plan.cancelled_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_only_defaults_to_true() {
        assert!(PlanListQuery::default().active_only());
        assert!(!PlanListQuery {
            active_only: Some(false)
        }
        .active_only());
    }
}
