//! CreateCustomerHandler - links an account to a payment provider customer.

use std::sync::Arc;

use crate::application::ServiceError;
use crate::domain::foundation::{ErrorCode, UserId};
use crate::ports::{CreateCustomerRequest, PaymentProvider, UserRepository};

#[derive(Debug, Clone)]
pub struct CreateCustomerCommand {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCustomerResult {
    pub customer_id: String,
    /// False when the account already had a customer and nothing was created.
    pub created: bool,
}

pub struct CreateCustomerHandler {
    users: Arc<dyn UserRepository>,
    payments: Arc<dyn PaymentProvider>,
}

impl CreateCustomerHandler {
    pub fn new(users: Arc<dyn UserRepository>, payments: Arc<dyn PaymentProvider>) -> Self {
        Self { users, payments }
    }

    pub async fn handle(
        &self,
        cmd: CreateCustomerCommand,
    ) -> Result<CreateCustomerResult, ServiceError> {
        let user = self
            .users
            .find_by_id(cmd.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ErrorCode::UserNotFound, "User not found"))?;

        if let Some(customer_id) = user.stripe_customer_id {
            return Ok(CreateCustomerResult {
                customer_id,
                created: false,
            });
        }

        let customer = self
            .payments
            .create_customer(CreateCustomerRequest {
                user_id: user.id,
                email: user.email.clone(),
                name: user.full_name.clone(),
                idempotency_key: Some(format!("customer-{}", user.id)),
            })
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "customer creation failed");
                e
            })?;

        self.users
            .set_stripe_customer_id(user.id, &customer.id)
            .await?;
        tracing::info!(user_id = %user.id, customer_id = %customer.id, "payment customer created");

        Ok(CreateCustomerResult {
            customer_id: customer.id,
            created: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::user::NewUser;
    use crate::ports::PaymentError;

    async fn fixture() -> (CreateCustomerHandler, Arc<InMemoryUserRepository>, MockPaymentProvider, UserId) {
        let users = Arc::new(InMemoryUserRepository::new());
        let user = users
            .create(NewUser {
                email: "jane@example.com".to_string(),
                username: "jane".to_string(),
                full_name: Some("Jane".to_string()),
                password_hash: "hash".to_string(),
                is_admin: false,
            })
            .await
            .unwrap();
        let payments = MockPaymentProvider::new();
        let handler = CreateCustomerHandler::new(users.clone(), Arc::new(payments.clone()));
        (handler, users, payments, user.id)
    }

    #[tokio::test]
    async fn stores_customer_id_on_user() {
        let (handler, users, _, id) = fixture().await;
        let result = handler
            .handle(CreateCustomerCommand { user_id: id })
            .await
            .unwrap();

        assert!(result.created);
        let user = users.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(user.stripe_customer_id, Some(result.customer_id));
    }

    #[tokio::test]
    async fn second_call_reuses_existing_customer() {
        let (handler, _, payments, id) = fixture().await;
        let first = handler
            .handle(CreateCustomerCommand { user_id: id })
            .await
            .unwrap();
        let second = handler
            .handle(CreateCustomerCommand { user_id: id })
            .await
            .unwrap();

        assert!(!second.created);
        assert_eq!(first.customer_id, second.customer_id);
        assert_eq!(payments.calls_to("create_customer").len(), 1);
    }

    #[tokio::test]
    async fn provider_failure_leaves_user_unlinked() {
        let (handler, users, payments, id) = fixture().await;
        payments.set_next_error(PaymentError::network("timeout"));

        assert!(matches!(
            handler.handle(CreateCustomerCommand { user_id: id }).await,
            Err(ServiceError::Payment(_))
        ));
        let user = users.find_by_id(id).await.unwrap().unwrap();
        assert!(user.stripe_customer_id.is_none());
    }
}
