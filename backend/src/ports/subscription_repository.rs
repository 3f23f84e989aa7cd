//! Persistence port for users' plan subscriptions.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PageRequest, PlanId, UserId};
use crate::domain::plan::UserPlan;

/// Persistence for the user ↔ plan relationship.
///
/// A user has at most one active plan at a time.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Starts a new active subscription, cancelling any previous active one.
    async fn subscribe(&self, user_id: UserId, plan_id: PlanId) -> Result<UserPlan, DomainError>;

    async fn find_active(&self, user_id: UserId) -> Result<Option<UserPlan>, DomainError>;

    /// Returns `false` when the user had no active plan.
    async fn cancel_active(&self, user_id: UserId) -> Result<bool, DomainError>;

    /// One window of the user's subscriptions, newest first, plus their count.
    async fn history(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> Result<(Vec<UserPlan>, u64), DomainError>;
}
