//! A user's subscription to a plan.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PlanId, Timestamp, UserId, UserPlanId, ValidationError};

/// Lifecycle state of a user's plan subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserPlanStatus {
    Active,
    Cancelled,
}

impl UserPlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserPlanStatus::Active => "active",
            UserPlanStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.to_lowercase().as_str() {
            "active" => Ok(UserPlanStatus::Active),
            "cancelled" | "canceled" => Ok(UserPlanStatus::Cancelled),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown status '{}'", other),
            )),
        }
    }
}

/// One row of a user's plan history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPlan {
    pub id: UserPlanId,
    pub user_id: UserId,
    pub plan_id: PlanId,
    pub status: UserPlanStatus,
    pub started_at: Timestamp,
    pub cancelled_at: Option<Timestamp>,
}

impl UserPlan {
    pub fn is_active(&self) -> bool {
        self.status == UserPlanStatus::Active
    }

    /// Marks the subscription cancelled. Cancelling twice keeps the first
    /// cancellation time.
    pub fn cancel(&mut self, at: Timestamp) {
        if self.is_active() {
            self.status = UserPlanStatus::Cancelled;
            self.cancelled_at = Some(at);
        }
    }
}
