//! Plan domain: the catalogue of plans and users' subscriptions to them.

mod plan;
mod user_plan;

pub use plan::{BillingInterval, Plan, PlanCreate, PlanUpdate};
pub use user_plan::{UserPlan, UserPlanStatus};
