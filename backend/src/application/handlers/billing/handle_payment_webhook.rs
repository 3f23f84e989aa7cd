//! HandlePaymentWebhookHandler - verifies and dispatches provider webhooks.

use std::sync::Arc;

use crate::application::ServiceError;
use crate::domain::foundation::UserId;
use crate::ports::{
    PaymentProvider, SubscriptionRepository, WebhookEvent, WebhookEventData, WebhookEventType,
};

#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    pub payload: Vec<u8>,
    pub signature: String,
}

/// What the dispatcher did with a verified event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentWebhookResult {
    PaymentRecorded { payment_intent_id: String },
    SubscriptionRecorded { subscription_id: String },
    /// The subscriber's local plan was cancelled.
    PlanCancelled { user_id: UserId },
    /// Verified, but nothing to change locally.
    Acknowledged,
    /// Event type we do not react to.
    Ignored,
}

pub struct HandlePaymentWebhookHandler {
    payments: Arc<dyn PaymentProvider>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        payments: Arc<dyn PaymentProvider>,
        subscriptions: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            payments,
            subscriptions,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, ServiceError> {
        let event = self
            .payments
            .verify_webhook(&cmd.payload, &cmd.signature)
            .await?;

        match &event.event_type {
            WebhookEventType::PaymentIntentSucceeded => Ok(self.payment_succeeded(&event)),
            WebhookEventType::SubscriptionCreated => Ok(self.subscription_created(&event)),
            WebhookEventType::SubscriptionDeleted => self.subscription_deleted(&event).await,
            WebhookEventType::Unknown(kind) => {
                tracing::debug!(event_id = %event.id, event_type = %kind, "webhook ignored");
                Ok(HandlePaymentWebhookResult::Ignored)
            }
        }
    }

    fn payment_succeeded(&self, event: &WebhookEvent) -> HandlePaymentWebhookResult {
        match &event.data {
            WebhookEventData::PaymentIntent {
                payment_intent_id,
                customer_id,
                amount,
                currency,
            } => {
                tracing::info!(
                    event_id = %event.id,
                    payment_intent_id = %payment_intent_id,
                    customer_id = ?customer_id,
                    amount,
                    currency = %currency,
                    "payment succeeded"
                );
                HandlePaymentWebhookResult::PaymentRecorded {
                    payment_intent_id: payment_intent_id.clone(),
                }
            }
            _ => HandlePaymentWebhookResult::Acknowledged,
        }
    }

    fn subscription_created(&self, event: &WebhookEvent) -> HandlePaymentWebhookResult {
        match &event.data {
            WebhookEventData::Subscription {
                subscription_id,
                customer_id,
                status,
                ..
            } => {
                tracing::info!(
                    event_id = %event.id,
                    subscription_id = %subscription_id,
                    customer_id = %customer_id,
                    status = ?status,
                    "subscription created"
                );
                HandlePaymentWebhookResult::SubscriptionRecorded {
                    subscription_id: subscription_id.clone(),
                }
            }
            _ => HandlePaymentWebhookResult::Acknowledged,
        }
    }

    /// Cancels the local plan when the subscription metadata names a user.
    async fn subscription_deleted(
        &self,
        event: &WebhookEvent,
    ) -> Result<HandlePaymentWebhookResult, ServiceError> {
        let WebhookEventData::Subscription {
            subscription_id,
            user_id,
            ..
        } = &event.data
        else {
            return Ok(HandlePaymentWebhookResult::Acknowledged);
        };

        let Some(user_id) = user_id.as_deref().and_then(|s| s.parse::<UserId>().ok()) else {
            tracing::warn!(
                event_id = %event.id,
                subscription_id = %subscription_id,
                "deleted subscription carries no usable user_id"
            );
            return Ok(HandlePaymentWebhookResult::Acknowledged);
        };

        if self.subscriptions.cancel_active(user_id).await? {
            tracing::info!(
                user_id = %user_id,
                subscription_id = %subscription_id,
                "plan cancelled after subscription deletion"
            );
            Ok(HandlePaymentWebhookResult::PlanCancelled { user_id })
        } else {
            Ok(HandlePaymentWebhookResult::Acknowledged)
        }
    }
}
