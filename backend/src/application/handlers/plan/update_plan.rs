//! UpdatePlanHandler and DeletePlanHandler - admin catalogue maintenance.

use std::sync::Arc;

use crate::application::ServiceError;
use crate::domain::foundation::{AuthenticatedUser, ErrorCode, PlanId};
use crate::domain::plan::{Plan, PlanUpdate};
use crate::ports::PlanRepository;

#[derive(Debug, Clone)]
pub struct UpdatePlanCommand {
    pub actor: AuthenticatedUser,
    pub plan_id: PlanId,
    pub update: PlanUpdate,
}

#[derive(Debug, Clone)]
pub struct DeletePlanCommand {
    pub actor: AuthenticatedUser,
    pub plan_id: PlanId,
}

fn plan_not_found() -> ServiceError {
    ServiceError::not_found(ErrorCode::PlanNotFound, "Plan not found")
}

pub struct UpdatePlanHandler {
    plans: Arc<dyn PlanRepository>,
}

impl UpdatePlanHandler {
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self { plans }
    }

    pub async fn handle(&self, cmd: UpdatePlanCommand) -> Result<Plan, ServiceError> {
        cmd.actor.require_admin()?;
        cmd.update.validate()?;

        self.plans
            .update(cmd.plan_id, &cmd.update)
            .await?
            .ok_or_else(plan_not_found)
    }
}

pub struct DeletePlanHandler {
    plans: Arc<dyn PlanRepository>,
}

impl DeletePlanHandler {
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self { plans }
    }

    pub async fn handle(&self, cmd: DeletePlanCommand) -> Result<(), ServiceError> {
        cmd.actor.require_admin()?;

        if !self.plans.delete(cmd.plan_id).await? {
            return Err(plan_not_found());
        }
        tracing::info!(plan_id = %cmd.plan_id, actor = %cmd.actor.id, "plan deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPlanRepository;
    use crate::domain::foundation::{AuthError, UserId};
    use crate::domain::plan::{BillingInterval, PlanCreate};

    fn admin() -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(1).unwrap(), "a@example.com", None, true)
    }

    async fn seeded() -> (Arc<InMemoryPlanRepository>, PlanId) {
        let plans = Arc::new(InMemoryPlanRepository::new());
        let plan = plans
            .create(&PlanCreate {
                name: "Basic".to_string(),
                description: None,
                price_cents: 900,
                currency: "usd".to_string(),
                interval: BillingInterval::Month,
                stripe_price_id: None,
                features: vec![],
                is_active: true,
            })
            .await
            .unwrap();
        (plans, plan.id)
    }

    #[tokio::test]
    async fn update_changes_price() {
        let (plans, id) = seeded().await;
        let plan = UpdatePlanHandler::new(plans)
            .handle(UpdatePlanCommand {
                actor: admin(),
                plan_id: id,
                update: PlanUpdate {
                    price_cents: Some(1200),
                    ..Default::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(plan.price_cents, 1200);
    }

    #[tokio::test]
    async fn update_of_unknown_plan_is_not_found() {
        let (plans, _) = seeded().await;
        let err = UpdatePlanHandler::new(plans)
            .handle(UpdatePlanCommand {
                actor: admin(),
                plan_id: PlanId::new(77).unwrap(),
                update: PlanUpdate::default(),
            })
            .await
            .unwrap_err();
        match err {
            ServiceError::Domain(e) => assert_eq!(e.code, ErrorCode::PlanNotFound),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn delete_requires_admin_then_removes() {
        let (plans, id) = seeded().await;
        let handler = DeletePlanHandler::new(plans.clone());
        let member = AuthenticatedUser::new(UserId::new(2).unwrap(), "m@example.com", None, false);

        assert!(matches!(
            handler
                .handle(DeletePlanCommand {
                    actor: member,
                    plan_id: id
                })
                .await,
            Err(ServiceError::Auth(AuthError::InsufficientPermissions))
        ));

        handler
            .handle(DeletePlanCommand {
                actor: admin(),
                plan_id: id,
            })
            .await
            .unwrap();
        assert!(plans.find_by_id(id).await.unwrap().is_none());

        assert!(handler
            .handle(DeletePlanCommand {
                actor: admin(),
                plan_id: id
            })
            .await
            .is_err());
    }
}
