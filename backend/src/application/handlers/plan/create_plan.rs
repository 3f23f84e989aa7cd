//! CreatePlanHandler - adds a plan to the catalogue.

use std::sync::Arc;

use crate::application::ServiceError;
use crate::domain::foundation::AuthenticatedUser;
use crate::domain::plan::{Plan, PlanCreate};
use crate::ports::PlanRepository;

#[derive(Debug, Clone)]
pub struct CreatePlanCommand {
    pub actor: AuthenticatedUser,
    pub plan: PlanCreate,
}

pub struct CreatePlanHandler {
    plans: Arc<dyn PlanRepository>,
}

impl CreatePlanHandler {
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self { plans }
    }

    /// Admin only.
    pub async fn handle(&self, cmd: CreatePlanCommand) -> Result<Plan, ServiceError> {
        cmd.actor.require_admin()?;
        cmd.plan.validate()?;

        let plan = self.plans.create(&cmd.plan).await?;
        tracing::info!(plan_id = %plan.id, actor = %cmd.actor.id, "plan created");
        Ok(plan)
    }
}
