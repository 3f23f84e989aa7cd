//! PostgreSQL implementation of PlanRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, PlanId, Timestamp};
use crate::domain::plan::{BillingInterval, Plan, PlanCreate, PlanUpdate};
use crate::ports::PlanRepository;

const PLAN_COLUMNS: &str = "id, name, description, price_cents, currency, billing_interval, \
                            stripe_price_id, features, is_active, created_at, updated_at";

/// Foreign key from `user_plans.plan_id`.
const PLAN_IN_USE_CONSTRAINT: &str = "user_plans_plan_id_fkey";

pub struct PostgresPlanRepository {
    pool: PgPool,
}

impl PostgresPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: i64,
    name: String,
    description: Option<String>,
    price_cents: i64,
    currency: String,
    billing_interval: String,
    stripe_price_id: Option<String>,
    features: Vec<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PlanRow> for Plan {
    type Error = DomainError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        let corrupt =
            |e: crate::domain::foundation::ValidationError| DomainError::database(e.to_string());

        Ok(Plan {
            id: PlanId::new(row.id).map_err(corrupt)?,
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
            currency: row.currency,
            interval: BillingInterval::parse(&row.billing_interval).map_err(corrupt)?,
            stripe_price_id: row.stripe_price_id,
            features: row.features,
            is_active: row.is_active,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl PlanRepository for PostgresPlanRepository {
    async fn list(&self, active_only: bool) -> Result<Vec<Plan>, DomainError> {
        let rows: Vec<PlanRow> = sqlx::query_as(&format!(
            r#"
            SELECT {PLAN_COLUMNS} FROM plans
            WHERE ($1 = FALSE OR is_active = TRUE)
            ORDER BY price_cents ASC, id ASC
            "#
        ))
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list plans: {}", e)))?;

        rows.into_iter().map(Plan::try_from).collect()
    }

    async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, DomainError> {
        let row: Option<PlanRow> =
            sqlx::query_as(&format!("SELECT {PLAN_COLUMNS} FROM plans WHERE id = $1"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to find plan: {}", e)))?;

        row.map(Plan::try_from).transpose()
    }

    async fn create(&self, plan: &PlanCreate) -> Result<Plan, DomainError> {
        let row: PlanRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO plans (
                name, description, price_cents, currency, billing_interval,
                stripe_price_id, features, is_active
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(plan.name.trim())
        .bind(&plan.description)
        .bind(plan.price_cents)
        .bind(plan.currency.to_lowercase())
        .bind(plan.interval.as_str())
        .bind(&plan.stripe_price_id)
        .bind(&plan.features)
        .bind(plan.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to create plan: {}", e)))?;

        row.try_into()
    }

    async fn update(&self, id: PlanId, update: &PlanUpdate) -> Result<Option<Plan>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database(format!("Failed to begin transaction: {}", e)))?;

        let row: Option<PlanRow> = sqlx::query_as(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.as_i64())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load plan: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut plan = Plan::try_from(row)?;
        update.apply_to(&mut plan);

        let row: PlanRow = sqlx::query_as(&format!(
            r#"
            UPDATE plans SET
                name = $2,
                description = $3,
                price_cents = $4,
                currency = $5,
                billing_interval = $6,
                stripe_price_id = $7,
                features = $8,
                is_active = $9,
                updated_at = $10
            WHERE id = $1
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(id.as_i64())
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.price_cents)
        .bind(&plan.currency)
        .bind(plan.interval.as_str())
        .bind(&plan.stripe_price_id)
        .bind(&plan.features)
        .bind(plan.is_active)
        .bind(plan.updated_at.as_datetime())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update plan: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database(format!("Failed to commit: {}", e)))?;

        row.try_into().map(Some)
    }

    async fn delete(&self, id: PlanId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM plans WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.constraint() == Some(PLAN_IN_USE_CONSTRAINT) {
                        return DomainError::new(
                            ErrorCode::ValidationFailed,
                            "Plan has subscriptions; deactivate it instead",
                        );
                    }
                }
                DomainError::database(format!("Failed to delete plan: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(billing_interval: &str) -> PlanRow {
        let now = Utc::now();
        PlanRow {
            id: 3,
            name: "Pro".to_string(),
            description: None,
            price_cents: 2900,
            currency: "usd".to_string(),
            billing_interval: billing_interval.to_string(),
            stripe_price_id: Some("price_pro".to_string()),
            features: vec!["priority support".to_string()],
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn row_converts_to_plan() {
        let plan = Plan::try_from(row("year")).unwrap();
        assert_eq!(plan.interval, BillingInterval::Year);
        assert_eq!(plan.features, vec!["priority support"]);
    }

    #[test]
    fn unknown_interval_is_a_database_error() {
        let err = Plan::try_from(row("fortnight")).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
