//! User persistence port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PageRequest, UserId};
use crate::domain::user::{NewUser, User, UserUpdate};

/// Persistence for user accounts.
///
/// Listing order is ascending by id, so page windows are stable.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new account. Fails with `AlreadyExists` when the email is taken.
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Looks up by normalised (lower-case) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// One window of users plus the total user count.
    async fn list(&self, page: &PageRequest) -> Result<(Vec<User>, u64), DomainError>;

    /// Applies a partial update. Returns `None` when the user does not exist.
    async fn update(&self, id: UserId, update: &UserUpdate) -> Result<Option<User>, DomainError>;

    /// Records the billing provider's customer id on the account.
    async fn set_stripe_customer_id(
        &self,
        id: UserId,
        customer_id: &str,
    ) -> Result<Option<User>, DomainError>;

    /// Returns `false` when there was nothing to delete.
    async fn delete(&self, id: UserId) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn UserRepository) {}
    }
}
