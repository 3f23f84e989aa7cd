//! PostgreSQL implementation of SubscriptionRepository.
//!
//! `subscribe` cancels any active row and inserts the new one in a single
//! transaction; a partial unique index backs the one-active-plan rule.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{
    DomainError, ErrorCode, PageRequest, PlanId, Timestamp, UserId, UserPlanId, ValidationError,
};
use crate::domain::plan::{UserPlan, UserPlanStatus};
use crate::ports::SubscriptionRepository;

const USER_PLAN_COLUMNS: &str = "id, user_id, plan_id, status, started_at, cancelled_at";

pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserPlanRow {
    id: i64,
    user_id: i64,
    plan_id: i64,
    status: String,
    started_at: DateTime<Utc>,
    cancelled_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserPlanRow> for UserPlan {
    type Error = DomainError;

    fn try_from(row: UserPlanRow) -> Result<Self, Self::Error> {
        let corrupt = |e: ValidationError| DomainError::database(e.to_string());

        Ok(UserPlan {
            id: UserPlanId::new(row.id).map_err(corrupt)?,
            user_id: UserId::new(row.user_id).map_err(corrupt)?,
            plan_id: PlanId::new(row.plan_id).map_err(corrupt)?,
            status: UserPlanStatus::parse(&row.status).map_err(corrupt)?,
            started_at: Timestamp::from_datetime(row.started_at),
            cancelled_at: row.cancelled_at.map(Timestamp::from_datetime),
        })
    }
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn subscribe(&self, user_id: UserId, plan_id: PlanId) -> Result<UserPlan, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query(
            r#"
            UPDATE user_plans SET status = 'cancelled', cancelled_at = NOW()
            WHERE user_id = $1 AND status = 'active'
            "#,
        )
        .bind(user_id.as_i64())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to cancel previous plan: {}", e)))?;

        let row: UserPlanRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO user_plans (user_id, plan_id, status)
            VALUES ($1, $2, 'active')
            RETURNING {USER_PLAN_COLUMNS}
            "#
        ))
        .bind(user_id.as_i64())
        .bind(plan_id.as_i64())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("user_plans_plan_id_fkey") {
                    return DomainError::new(ErrorCode::PlanNotFound, "Plan not found");
                }
            }
            DomainError::database(format!("Failed to subscribe: {}", e))
        })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database(format!("Failed to commit: {}", e)))?;

        row.try_into()
    }

    async fn find_active(&self, user_id: UserId) -> Result<Option<UserPlan>, DomainError> {
        let row: Option<UserPlanRow> = sqlx::query_as(&format!(
            r#"
            SELECT {USER_PLAN_COLUMNS} FROM user_plans
            WHERE user_id = $1 AND status = 'active'
            ORDER BY started_at DESC, id DESC
            LIMIT 1
            "#
        ))
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find active plan: {}", e)))?;

        row.map(UserPlan::try_from).transpose()
    }

    async fn cancel_active(&self, user_id: UserId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE user_plans SET status = 'cancelled', cancelled_at = NOW()
            WHERE user_id = $1 AND status = 'active'
            "#,
        )
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to cancel plan: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn history(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> Result<(Vec<UserPlan>, u64), DomainError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_plans WHERE user_id = $1")
            .bind(user_id.as_i64())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to count history: {}", e)))?;

        let rows: Vec<UserPlanRow> = sqlx::query_as(&format!(
            r#"
            SELECT {USER_PLAN_COLUMNS} FROM user_plans
            WHERE user_id = $1
            ORDER BY started_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id.as_i64())
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load history: {}", e)))?;

        let items = rows
            .into_iter()
            .map(UserPlan::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((items, total.max(0) as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_converts_and_accepts_american_spelling() {
        let row = UserPlanRow {
            id: 1,
            user_id: 2,
            plan_id: 3,
            status: "canceled".to_string(),
            started_at: Utc::now(),
            cancelled_at: Some(Utc::now()),
        };

        let plan = UserPlan::try_from(row).unwrap();
        assert_eq!(plan.status, UserPlanStatus::Cancelled);
        assert!(plan.cancelled_at.is_some());
    }

    #[test]
    fn unknown_status_is_a_database_error() {
        let row = UserPlanRow {
            id: 1,
            user_id: 2,
            plan_id: 3,
            status: "paused".to_string(),
            started_at: Utc::now(),
            cancelled_at: None,
        };

        assert_eq!(
            UserPlan::try_from(row).unwrap_err().code,
            ErrorCode::DatabaseError
        );
    }
}
