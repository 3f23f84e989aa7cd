//! Payment intent and subscription creation for the calling account.

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::ServiceError;
use crate::domain::foundation::{ErrorCode, UserId};
use crate::domain::user::User;
use crate::ports::{
    CreatePaymentIntentRequest, CreateSubscriptionRequest, PaymentIntent, PaymentProvider,
    Subscription, UserRepository,
};

async fn load_user(users: &dyn UserRepository, id: UserId) -> Result<User, ServiceError> {
    users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found(ErrorCode::UserNotFound, "User not found"))
}

#[derive(Debug, Clone)]
pub struct CreatePaymentIntentCommand {
    pub user_id: UserId,
    pub amount: i64,
    pub currency: String,
    pub metadata: HashMap<String, String>,
}

pub struct CreatePaymentIntentHandler {
    users: Arc<dyn UserRepository>,
    payments: Arc<dyn PaymentProvider>,
}

impl CreatePaymentIntentHandler {
    pub fn new(users: Arc<dyn UserRepository>, payments: Arc<dyn PaymentProvider>) -> Self {
        Self { users, payments }
    }

    /// Attaches the caller's customer when one exists; guest intents are allowed.
    pub async fn handle(
        &self,
        cmd: CreatePaymentIntentCommand,
    ) -> Result<PaymentIntent, ServiceError> {
        if cmd.amount <= 0 {
            return Err(ServiceError::validation("amount", "Amount must be positive"));
        }
        let user = load_user(self.users.as_ref(), cmd.user_id).await?;

        let mut metadata = cmd.metadata;
        metadata.insert("user_id".to_string(), user.id.to_string());

        let intent = self
            .payments
            .create_payment_intent(CreatePaymentIntentRequest {
                amount: cmd.amount,
                currency: cmd.currency,
                customer_id: user.stripe_customer_id,
                metadata,
            })
            .await?;
        tracing::info!(user_id = %user.id, payment_intent_id = %intent.id, "payment intent created");
        Ok(intent)
    }
}

#[derive(Debug, Clone)]
pub struct CreateSubscriptionCommand {
    pub user_id: UserId,
    pub price_id: String,
    pub trial_days: u32,
}

pub struct CreateSubscriptionHandler {
    users: Arc<dyn UserRepository>,
    payments: Arc<dyn PaymentProvider>,
}

impl CreateSubscriptionHandler {
    pub fn new(users: Arc<dyn UserRepository>, payments: Arc<dyn PaymentProvider>) -> Self {
        Self { users, payments }
    }

    /// Requires a linked customer; see `CreateCustomerHandler`.
    pub async fn handle(
        &self,
        cmd: CreateSubscriptionCommand,
    ) -> Result<Subscription, ServiceError> {
        if cmd.price_id.trim().is_empty() {
            return Err(ServiceError::validation("price_id", "Price id is required"));
        }
        let user = load_user(self.users.as_ref(), cmd.user_id).await?;
        let customer_id = user.stripe_customer_id.ok_or_else(|| {
            ServiceError::validation("stripe_customer_id", "No Stripe customer associated")
        })?;

        let mut metadata = HashMap::new();
        metadata.insert("user_id".to_string(), user.id.to_string());

        let subscription = self
            .payments
            .create_subscription(CreateSubscriptionRequest {
                customer_id,
                price_id: cmd.price_id,
                trial_days: cmd.trial_days,
                metadata,
            })
            .await?;
        tracing::info!(user_id = %user.id, subscription_id = %subscription.id, "subscription created");
        Ok(subscription)
    }
}
