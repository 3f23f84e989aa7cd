//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, PageRequest, Timestamp, UserId};
use crate::domain::user::{normalize_email, NewUser, User, UserUpdate};
use crate::ports::UserRepository;

const USER_COLUMNS: &str = "id, email, username, full_name, password_hash, is_active, is_admin, \
                            stripe_customer_id, created_at, updated_at";

/// PostgreSQL implementation of the UserRepository port.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    username: String,
    full_name: Option<String>,
    password_hash: String,
    is_active: bool,
    is_admin: bool,
    stripe_customer_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::new(row.id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user id: {}", e))
            })?,
            email: row.email,
            username: row.username,
            full_name: row.full_name,
            password_hash: row.password_hash,
            is_active: row.is_active,
            is_admin: row.is_admin,
            stripe_customer_id: row.stripe_customer_id,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

/// Maps unique-constraint violations to `AlreadyExists`, everything else to `DatabaseError`.
fn map_write_error(e: sqlx::Error, action: &str) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.constraint() {
            Some("users_email_key") => {
                return DomainError::new(ErrorCode::AlreadyExists, "Email already registered")
            }
            Some("users_username_key") => {
                return DomainError::new(ErrorCode::AlreadyExists, "Username already taken")
            }
            _ => {}
        }
    }
    DomainError::database(format!("Failed to {}: {}", action, e))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let row: UserRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (email, username, full_name, password_hash, is_admin)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(normalize_email(&user.email))
        .bind(&user.username)
        .bind(&user.full_name)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "create user"))?;

        row.try_into()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to find user: {}", e)))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(normalize_email(email))
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to find user: {}", e)))?;

        row.map(User::try_from).transpose()
    }

    async fn list(&self, page: &PageRequest) -> Result<(Vec<User>, u64), DomainError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to count users: {}", e)))?;

        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id ASC LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list users: {}", e)))?;

        let users = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((users, total.max(0) as u64))
    }

    async fn update(&self, id: UserId, update: &UserUpdate) -> Result<Option<User>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database(format!("Failed to begin transaction: {}", e)))?;

        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.as_i64())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load user: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut user = User::try_from(row)?;
        update.apply_to(&mut user);

        let row: UserRow = sqlx::query_as(&format!(
            r#"
            UPDATE users SET
                email = $2,
                username = $3,
                full_name = $4,
                is_active = $5,
                updated_at = $6
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id.as_i64())
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.full_name)
        .bind(user.is_active)
        .bind(user.updated_at.as_datetime())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "update user"))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database(format!("Failed to commit: {}", e)))?;

        row.try_into().map(Some)
    }

    async fn set_stripe_customer_id(
        &self,
        id: UserId,
        customer_id: &str,
    ) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            r#"
            UPDATE users SET stripe_customer_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id.as_i64())
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to store customer id: {}", e)))?;

        row.map(User::try_from).transpose()
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_converts_to_user() {
        let now = Utc::now();
        let row = UserRow {
            id: 7,
            email: "a@example.com".to_string(),
            username: "alice".to_string(),
            full_name: None,
            password_hash: "hash".to_string(),
            is_active: true,
            is_admin: false,
            stripe_customer_id: Some("cus_1".to_string()),
            created_at: now,
            updated_at: now,
        };

        let user = User::try_from(row).unwrap();
        assert_eq!(user.id.as_i64(), 7);
        assert_eq!(user.stripe_customer_id.as_deref(), Some("cus_1"));
    }

    #[test]
    fn row_with_non_positive_id_is_a_database_error() {
        let now = Utc::now();
        let row = UserRow {
            id: 0,
            email: "a@example.com".to_string(),
            username: "alice".to_string(),
            full_name: None,
            password_hash: "hash".to_string(),
            is_active: true,
            is_admin: false,
            stripe_customer_id: None,
            created_at: now,
            updated_at: now,
        };

        let err = User::try_from(row).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn non_database_errors_map_to_database_error() {
        let err = map_write_error(sqlx::Error::RowNotFound, "create user");
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains("create user"));
    }
}
