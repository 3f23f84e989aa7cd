//! In-memory implementation of the SubscriptionRepository port.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, PageRequest, PlanId, Timestamp, UserId, UserPlanId};
use crate::domain::plan::{UserPlan, UserPlanStatus};
use crate::ports::SubscriptionRepository;

#[derive(Debug, Default)]
struct Store {
    last_id: i64,
    /// Insertion order equals id order.
    rows: Vec<UserPlan>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemorySubscriptionRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn subscribe(&self, user_id: UserId, plan_id: PlanId) -> Result<UserPlan, DomainError> {
        let mut store = self.store.write().await;
        let id = UserPlanId::new(store.last_id + 1)?;
        store.last_id += 1;

        let now = Timestamp::now();
        for row in store.rows.iter_mut().filter(|r| r.user_id == user_id) {
            row.cancel(now);
        }

        let created = UserPlan {
            id,
            user_id,
            plan_id,
            status: UserPlanStatus::Active,
            started_at: now,
            cancelled_at: None,
        };
        store.rows.push(created.clone());
        Ok(created)
    }

    async fn find_active(&self, user_id: UserId) -> Result<Option<UserPlan>, DomainError> {
        Ok(self
            .store
            .read()
            .await
            .rows
            .iter()
            .rev()
            .find(|r| r.user_id == user_id && r.is_active())
            .cloned())
    }

    async fn cancel_active(&self, user_id: UserId) -> Result<bool, DomainError> {
        let mut store = self.store.write().await;
        let now = Timestamp::now();
        let mut cancelled = false;
        for row in store
            .rows
            .iter_mut()
            .filter(|r| r.user_id == user_id && r.is_active())
        {
            row.cancel(now);
            cancelled = true;
        }
        Ok(cancelled)
    }

    async fn history(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> Result<(Vec<UserPlan>, u64), DomainError> {
        let store = self.store.read().await;
        let newest_first: Vec<UserPlan> = store
            .rows
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        let total = newest_first.len() as u64;
        Ok((page.slice(&newest_first).to_vec(), total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> UserId {
        UserId::new(id).unwrap()
    }

    fn plan(id: i64) -> PlanId {
        PlanId::new(id).unwrap()
    }

    #[tokio::test]
    async fn subscribe_replaces_previous_active_plan() {
        let repo = InMemorySubscriptionRepository::new();
        repo.subscribe(user(1), plan(1)).await.unwrap();
        let second = repo.subscribe(user(1), plan(2)).await.unwrap();

        let active = repo.find_active(user(1)).await.unwrap().unwrap();
        assert_eq!(active.id, second.id);
        assert_eq!(active.plan_id, plan(2));

        let (history, total) = repo.history(user(1), &PageRequest::default()).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(history[0].plan_id, plan(2));
        assert_eq!(history[1].status, UserPlanStatus::Cancelled);
    }

    #[tokio::test]
    async fn cancel_active_reports_nothing_to_cancel() {
        let repo = InMemorySubscriptionRepository::new();
        assert!(!repo.cancel_active(user(1)).await.unwrap());

        repo.subscribe(user(1), plan(1)).await.unwrap();
        assert!(repo.cancel_active(user(1)).await.unwrap());
        assert!(repo.find_active(user(1)).await.unwrap().is_none());
        assert!(!repo.cancel_active(user(1)).await.unwrap());
    }

    #[tokio::test]
    async fn history_is_scoped_to_user_and_paginated() {
        let repo = InMemorySubscriptionRepository::new();
        for p in 1..=3 {
            repo.subscribe(user(1), plan(p)).await.unwrap();
        }
        repo.subscribe(user(2), plan(1)).await.unwrap();

        let (page, total) = repo.history(user(1), &PageRequest::new(2, 2)).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].plan_id, plan(1));
    }
}
