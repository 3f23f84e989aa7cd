//! In-memory implementation of the PlanRepository port.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, PlanId, Timestamp};
use crate::domain::plan::{Plan, PlanCreate, PlanUpdate};
use crate::ports::PlanRepository;

#[derive(Debug, Default)]
struct Store {
    last_id: i64,
    plans: BTreeMap<PlanId, Plan>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryPlanRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn list(&self, active_only: bool) -> Result<Vec<Plan>, DomainError> {
        let store = self.store.read().await;
        let mut plans: Vec<Plan> = store
            .plans
            .values()
            .filter(|p| !active_only || p.is_active)
            .cloned()
            .collect();
        plans.sort_by_key(|p| (p.price_cents, p.id));
        Ok(plans)
    }

    async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, DomainError> {
        Ok(self.store.read().await.plans.get(&id).cloned())
    }

    async fn create(&self, plan: &PlanCreate) -> Result<Plan, DomainError> {
        let mut store = self.store.write().await;
        let id = PlanId::new(store.last_id + 1)?;
        store.last_id += 1;

        let now = Timestamp::now();
        let created = Plan {
            id,
            name: plan.name.trim().to_string(),
            description: plan.description.clone(),
            price_cents: plan.price_cents,
            currency: plan.currency.to_lowercase(),
            interval: plan.interval,
            stripe_price_id: plan.stripe_price_id.clone(),
            features: plan.features.clone(),
            is_active: plan.is_active,
            created_at: now,
            updated_at: now,
        };
        store.plans.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: PlanId, update: &PlanUpdate) -> Result<Option<Plan>, DomainError> {
        let mut store = self.store.write().await;
        Ok(store.plans.get_mut(&id).map(|plan| {
            update.apply_to(plan);
            plan.clone()
        }))
    }

    async fn delete(&self, id: PlanId) -> Result<bool, DomainError> {
        Ok(self.store.write().await.plans.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plan::BillingInterval;

    fn plan(name: &str, price_cents: i64, is_active: bool) -> PlanCreate {
        PlanCreate {
            name: name.to_string(),
            description: None,
            price_cents,
            currency: "USD".to_string(),
            interval: BillingInterval::Month,
            stripe_price_id: None,
            features: vec![],
            is_active,
        }
    }

    #[tokio::test]
    async fn list_orders_by_price_and_filters_inactive() {
        let repo = InMemoryPlanRepository::new();
        repo.create(&plan("Pro", 2900, true)).await.unwrap();
        repo.create(&plan("Legacy", 500, false)).await.unwrap();
        repo.create(&plan("Starter", 900, true)).await.unwrap();

        let active: Vec<String> = repo
            .list(true)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(active, vec!["Starter", "Pro"]);
        assert_eq!(repo.list(false).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn create_normalises_currency() {
        let repo = InMemoryPlanRepository::new();
        let created = repo.create(&plan("Pro", 2900, true)).await.unwrap();
        assert_eq!(created.currency, "usd");
    }

    #[tokio::test]
    async fn update_applies_partial_fields() {
        let repo = InMemoryPlanRepository::new();
        let created = repo.create(&plan("Pro", 2900, true)).await.unwrap();

        let update = PlanUpdate {
            price_cents: Some(3900),
            ..Default::default()
        };
        let updated = repo.update(created.id, &update).await.unwrap().unwrap();
        assert_eq!(updated.price_cents, 3900);
        assert_eq!(updated.name, "Pro");
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let repo = InMemoryPlanRepository::new();
        let created = repo.create(&plan("Pro", 2900, true)).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
    }
}
