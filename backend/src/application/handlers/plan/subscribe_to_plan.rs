//! SubscribeToPlanHandler and CancelUserPlanHandler - a user's own plan.

use std::sync::Arc;

use crate::application::ServiceError;
use crate::domain::foundation::{ErrorCode, PlanId, UserId};
use crate::domain::plan::UserPlan;
use crate::ports::{PlanRepository, SubscriptionRepository};

#[derive(Debug, Clone)]
pub struct SubscribeToPlanCommand {
    pub user_id: UserId,
    pub plan_id: PlanId,
}

#[derive(Debug, Clone)]
pub struct CancelUserPlanCommand {
    pub user_id: UserId,
}

pub struct SubscribeToPlanHandler {
    plans: Arc<dyn PlanRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl SubscribeToPlanHandler {
    pub fn new(
        plans: Arc<dyn PlanRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            plans,
            subscriptions,
        }
    }

    /// Inactive plans cannot be joined. Any previous active plan is replaced.
    pub async fn handle(&self, cmd: SubscribeToPlanCommand) -> Result<UserPlan, ServiceError> {
        let available = self
            .plans
            .find_by_id(cmd.plan_id)
            .await?
            .is_some_and(|p| p.is_active);
        if !available {
            return Err(ServiceError::not_found(
                ErrorCode::PlanNotFound,
                "Plan not found",
            ));
        }

        let user_plan = self
            .subscriptions
            .subscribe(cmd.user_id, cmd.plan_id)
            .await?;
        tracing::info!(user_id = %cmd.user_id, plan_id = %cmd.plan_id, "user subscribed to plan");
        Ok(user_plan)
    }
}

pub struct CancelUserPlanHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl CancelUserPlanHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    pub async fn handle(&self, cmd: CancelUserPlanCommand) -> Result<(), ServiceError> {
        if !self.subscriptions.cancel_active(cmd.user_id).await? {
            return Err(ServiceError::not_found(
                ErrorCode::SubscriptionNotFound,
                "No active plan to cancel",
            ));
        }
        tracing::info!(user_id = %cmd.user_id, "user plan cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryPlanRepository, InMemorySubscriptionRepository};
    use crate::domain::plan::{BillingInterval, PlanCreate, UserPlanStatus};

    struct Fixture {
        subscriptions: Arc<InMemorySubscriptionRepository>,
        subscribe: SubscribeToPlanHandler,
        cancel: CancelUserPlanHandler,
        active_plan: PlanId,
        retired_plan: PlanId,
    }

    async fn fixture() -> Fixture {
        let plans = Arc::new(InMemoryPlanRepository::new());
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
        let mut ids = Vec::new();
        for (name, is_active) in [("Pro", true), ("Legacy", false)] {
            let plan = plans
                .create(&PlanCreate {
                    name: name.to_string(),
                    description: None,
                    price_cents: 1000,
                    currency: "usd".to_string(),
                    interval: BillingInterval::Month,
                    stripe_price_id: None,
                    features: vec![],
                    is_active,
                })
                .await
                .unwrap();
            ids.push(plan.id);
        }
        Fixture {
            subscribe: SubscribeToPlanHandler::new(plans, subscriptions.clone()),
            cancel: CancelUserPlanHandler::new(subscriptions.clone()),
            subscriptions,
            active_plan: ids[0],
            retired_plan: ids[1],
        }
    }

    fn user() -> UserId {
        UserId::new(5).unwrap()
    }

    #[tokio::test]
    async fn subscribe_then_cancel() {
        let f = fixture().await;
        let user_plan = f
            .subscribe
            .handle(SubscribeToPlanCommand {
                user_id: user(),
                plan_id: f.active_plan,
            })
            .await
            .unwrap();
        assert_eq!(user_plan.status, UserPlanStatus::Active);

        f.cancel
            .handle(CancelUserPlanCommand { user_id: user() })
            .await
            .unwrap();
        assert!(f.subscriptions.find_active(user()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn inactive_plan_is_not_found() {
        let f = fixture().await;
        assert!(f
            .subscribe
            .handle(SubscribeToPlanCommand {
                user_id: user(),
                plan_id: f.retired_plan,
            })
            .await
            .is_err());
    }

    #[tokio::test]
    async fn cancel_without_plan_is_not_found() {
        let f = fixture().await;
        let err = f
            .cancel
            .handle(CancelUserPlanCommand { user_id: user() })
            .await
            .unwrap_err();
        match err {
            ServiceError::Domain(e) => {
                assert!(e.code.is_not_found());
                assert_eq!(e.message, "No active plan to cancel");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
