//! Plan catalogue persistence port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PlanId};
use crate::domain::plan::{Plan, PlanCreate, PlanUpdate};

/// Persistence for the plan catalogue.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// All plans ordered by price then id; inactive plans only when asked.
    async fn list(&self, active_only: bool) -> Result<Vec<Plan>, DomainError>;

    async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, DomainError>;

    async fn create(&self, plan: &PlanCreate) -> Result<Plan, DomainError>;

    /// Returns `None` when the plan does not exist.
    async fn update(&self, id: PlanId, update: &PlanUpdate) -> Result<Option<Plan>, DomainError>;

    /// Returns `false` when there was nothing to delete.
    async fn delete(&self, id: PlanId) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn PlanRepository) {}
    }
}
