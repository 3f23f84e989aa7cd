//! In-memory implementation of the UserRepository port.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, PageRequest, Timestamp, UserId};
use crate::domain::user::{normalize_email, NewUser, User, UserUpdate};
use crate::ports::UserRepository;

#[derive(Debug, Default)]
struct Store {
    last_id: i64,
    users: BTreeMap<UserId, User>,
}

impl Store {
    fn ensure_unique(
        &self,
        email: &str,
        username: &str,
        except: Option<UserId>,
    ) -> Result<(), DomainError> {
        for user in self.users.values().filter(|u| Some(u.id) != except) {
            if user.email == email {
                return Err(DomainError::new(
                    ErrorCode::AlreadyExists,
                    "Email already registered",
                ));
            }
            if user.username == username {
                return Err(DomainError::new(
                    ErrorCode::AlreadyExists,
                    "Username already taken",
                ));
            }
        }
        Ok(())
    }
}

/// Users kept in a `BTreeMap`, so listing is naturally ordered by id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn count(&self) -> usize {
        self.store.read().await.users.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut store = self.store.write().await;
        let email = normalize_email(&user.email);
        store.ensure_unique(&email, &user.username, None)?;

        let id = UserId::new(store.last_id + 1)?;
        store.last_id += 1;

        let now = Timestamp::now();
        let created = User {
            id,
            email,
            username: user.username,
            full_name: user.full_name,
            password_hash: user.password_hash,
            is_active: true,
            is_admin: user.is_admin,
            stripe_customer_id: None,
            created_at: now,
            updated_at: now,
        };
        store.users.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.store.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email = normalize_email(email);
        Ok(self
            .store
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self, page: &PageRequest) -> Result<(Vec<User>, u64), DomainError> {
        let store = self.store.read().await;
        let all: Vec<&User> = store.users.values().collect();
        let items = page.slice(&all).iter().map(|u| (*u).clone()).collect();
        Ok((items, all.len() as u64))
    }

    async fn update(&self, id: UserId, update: &UserUpdate) -> Result<Option<User>, DomainError> {
        let mut store = self.store.write().await;
        let Some(mut user) = store.users.get(&id).cloned() else {
            return Ok(None);
        };

        update.apply_to(&mut user);
        store.ensure_unique(&user.email, &user.username, Some(id))?;
        store.users.insert(id, user.clone());
        Ok(Some(user))
    }

    async fn set_stripe_customer_id(
        &self,
        id: UserId,
        customer_id: &str,
    ) -> Result<Option<User>, DomainError> {
        let mut store = self.store.write().await;
        Ok(store.users.get_mut(&id).map(|user| {
            user.stripe_customer_id = Some(customer_id.to_string());
            user.updated_at = Timestamp::now();
            user.clone()
        }))
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        Ok(self.store.write().await.users.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, username: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            username: username.to_string(),
            full_name: None,
            password_hash: "hash".to_string(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create(new_user("a@example.com", "alice")).await.unwrap();
        let b = repo.create(new_user("b@example.com", "bob")).await.unwrap();

        assert_eq!(a.id.as_i64(), 1);
        assert_eq!(b.id.as_i64(), 2);
        assert!(a.is_active);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email_case_insensitively() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("a@example.com", "alice")).await.unwrap();

        let err = repo
            .create(new_user("A@Example.com", "alice2"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn find_by_email_normalises_input() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("a@example.com", "alice")).await.unwrap();

        let found = repo.find_by_email(" A@EXAMPLE.COM ").await.unwrap();
        assert_eq!(found.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn list_pages_in_id_order() {
        let repo = InMemoryUserRepository::new();
        for i in 0..5 {
            repo.create(new_user(&format!("u{i}@example.com"), &format!("user{i}")))
                .await
                .unwrap();
        }

        let (items, total) = repo.list(&PageRequest::new(2, 2)).await.unwrap();
        assert_eq!(total, 5);
        let ids: Vec<i64> = items.iter().map(|u| u.id.as_i64()).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[tokio::test]
    async fn update_rejects_taken_email_and_keeps_original() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("a@example.com", "alice")).await.unwrap();
        let bob = repo.create(new_user("b@example.com", "bob")).await.unwrap();

        let update = UserUpdate {
            email: Some("a@example.com".to_string()),
            ..Default::default()
        };
        let err = repo.update(bob.id, &update).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyExists);

        let stored = repo.find_by_id(bob.id).await.unwrap().unwrap();
        assert_eq!(stored.email, "b@example.com");
    }

    #[tokio::test]
    async fn update_and_delete_unknown_user() {
        let repo = InMemoryUserRepository::new();
        let missing = UserId::new(99).unwrap();

        assert!(repo.update(missing, &UserUpdate::default()).await.unwrap().is_none());
        assert!(!repo.delete(missing).await.unwrap());
    }

    #[tokio::test]
    async fn set_stripe_customer_id_persists() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(new_user("a@example.com", "alice")).await.unwrap();

        repo.set_stripe_customer_id(user.id, "cus_123").await.unwrap();
        let stored = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.stripe_customer_id.as_deref(), Some("cus_123"));
    }
}
