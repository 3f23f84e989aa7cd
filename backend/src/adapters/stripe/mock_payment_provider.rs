//! Mock payment provider for testing.
//!
//! Records every call, generates Stripe-shaped ids and supports error
//! injection. Webhooks are verified with a real [`WebhookVerifier`] so tests
//! exercise the same signature path as production.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use secrecy::Secret;

use crate::domain::foundation::Timestamp;
use crate::ports::{
    CreateCustomerRequest, CreatePaymentIntentRequest, CreateSubscriptionRequest, Customer,
    PaymentError, PaymentIntent, PaymentProvider, Price, Subscription, SubscriptionStatus,
    WebhookEvent,
};

use super::webhook::{parse_event, WebhookVerifier};

/// Secret used by [`MockPaymentProvider::new`].
pub const MOCK_WEBHOOK_SECRET: &str = "whsec_mock_secret";

const THIRTY_DAYS_SECS: i64 = 30 * 24 * 60 * 60;

/// Mock payment provider for testing.
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
/// mock.fail_method("create_payment_intent", PaymentError::network("down"));
/// let header = mock.sign_payload(payload);
/// ```
#[derive(Clone)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
    verifier: WebhookVerifier,
}

#[derive(Default)]
struct MockState {
    subscriptions: HashMap<String, Subscription>,
    prices: Vec<Price>,
    next_error: Option<PaymentError>,
    method_errors: HashMap<String, PaymentError>,
    call_log: Vec<MethodCall>,
    sequence: u64,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl Default for MockPaymentProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::with_webhook_secret(MOCK_WEBHOOK_SECRET)
    }

    pub fn with_webhook_secret(secret: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState::default())),
            verifier: WebhookVerifier::new(Secret::new(secret.to_string())),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Configuration ──────────────────────────────────────────────────────

    /// Replaces the catalogue returned by `list_prices`.
    pub fn set_prices(&self, prices: Vec<Price>) {
        self.state().prices = prices;
    }

    pub fn add_subscription(&self, subscription: Subscription) {
        self.state()
            .subscriptions
            .insert(subscription.id.clone(), subscription);
    }

    /// Fails the next call, whichever method it is.
    pub fn set_next_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Fails every call to `method` until cleared.
    pub fn fail_method(&self, method: &str, error: PaymentError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    /// Produces a valid `Stripe-Signature` header for `payload`.
    pub fn sign_payload(&self, payload: &[u8]) -> Result<String, PaymentError> {
        self.verifier.sign(Timestamp::now().as_unix_secs(), payload)
    }

    // ── Assertions ─────────────────────────────────────────────────────────

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<MethodCall> {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|c| c.method == method)
    }

    // ── Internals ──────────────────────────────────────────────────────────

    fn record(&self, method: &str, args: Vec<String>) -> Result<(), PaymentError> {
        let mut state = self.state();
        state.call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }
        Ok(())
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut state = self.state();
        state.sequence += 1;
        format!("{}_mock_{:06}", prefix, state.sequence)
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError> {
        self.record(
            "create_customer",
            vec![request.user_id.to_string(), request.email.clone()],
        )?;

        Ok(Customer {
            id: self.next_id("cus"),
            email: request.email,
            name: request.name,
            created_at: Timestamp::now().as_unix_secs(),
        })
    }

    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        self.record(
            "create_payment_intent",
            vec![request.amount.to_string(), request.currency.clone()],
        )?;

        if request.amount <= 0 {
            return Err(PaymentError::invalid_request("Amount must be positive"));
        }

        let id = self.next_id("pi");
        Ok(PaymentIntent {
            client_secret: Some(format!("{}_secret_mock", id)),
            id,
            amount: request.amount,
            currency: request.currency.to_lowercase(),
            status: "requires_payment_method".to_string(),
        })
    }

    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<Subscription, PaymentError> {
        self.record(
            "create_subscription",
            vec![request.customer_id.clone(), request.price_id.clone()],
        )?;

        let now = Timestamp::now().as_unix_secs();
        let subscription = Subscription {
            id: self.next_id("sub"),
            customer_id: request.customer_id,
            status: if request.trial_days > 0 {
                SubscriptionStatus::Trialing
            } else {
                SubscriptionStatus::Active
            },
            current_period_start: now,
            current_period_end: now + THIRTY_DAYS_SECS,
            cancel_at_period_end: false,
            canceled_at: None,
        };
        self.add_subscription(subscription.clone());

        Ok(subscription)
    }

    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Subscription>, PaymentError> {
        self.record("get_subscription", vec![subscription_id.to_string()])?;
        Ok(self.state().subscriptions.get(subscription_id).cloned())
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Subscription, PaymentError> {
        self.record("cancel_subscription", vec![subscription_id.to_string()])?;

        let mut state = self.state();
        let subscription = state
            .subscriptions
            .get_mut(subscription_id)
            .ok_or_else(|| PaymentError::not_found("Subscription"))?;
        subscription.status = SubscriptionStatus::Canceled;
        subscription.canceled_at = Some(Timestamp::now().as_unix_secs());

        Ok(subscription.clone())
    }

    async fn list_prices(&self) -> Result<Vec<Price>, PaymentError> {
        self.record("list_prices", vec![])?;
        Ok(self.state().prices.clone())
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        self.record("verify_webhook", vec![signature.to_string()])?;
        self.verifier
            .verify(payload, signature, Timestamp::now().as_unix_secs())?;
        parse_event(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::ports::{PaymentErrorCode, WebhookEventData, WebhookEventType};

    fn customer_request() -> CreateCustomerRequest {
        CreateCustomerRequest {
            user_id: UserId::new(7).unwrap(),
            email: "jane@example.com".to_string(),
            name: None,
            idempotency_key: None,
        }
    }

    #[tokio::test]
    async fn generated_ids_are_unique() {
        let mock = MockPaymentProvider::new();
        let a = mock.create_customer(customer_request()).await.unwrap();
        let b = mock.create_customer(customer_request()).await.unwrap();
        assert!(a.id.starts_with("cus_"));
        assert_ne!(a.id, b.id);
        assert_eq!(mock.calls_to("create_customer").len(), 2);
    }

    #[tokio::test]
    async fn next_error_applies_once() {
        let mock = MockPaymentProvider::new();
        mock.set_next_error(PaymentError::network("connection reset"));

        let err = mock.create_customer(customer_request()).await.unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::NetworkError);
        assert!(mock.create_customer(customer_request()).await.is_ok());
    }

    #[tokio::test]
    async fn method_errors_persist_until_cleared() {
        let mock = MockPaymentProvider::new();
        mock.fail_method("list_prices", PaymentError::provider("boom"));

        assert!(mock.list_prices().await.is_err());
        assert!(mock.list_prices().await.is_err());
        mock.clear_errors();
        assert!(mock.list_prices().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn subscriptions_can_be_fetched_and_canceled() {
        let mock = MockPaymentProvider::new();
        let sub = mock
            .create_subscription(CreateSubscriptionRequest {
                customer_id: "cus_1".to_string(),
                price_id: "price_1".to_string(),
                trial_days: 0,
                metadata: HashMap::new(),
            })
            .await
            .unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);

        let canceled = mock.cancel_subscription(&sub.id).await.unwrap();
        assert_eq!(canceled.status, SubscriptionStatus::Canceled);
        assert!(canceled.canceled_at.is_some());

        let fetched = mock.get_subscription(&sub.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, SubscriptionStatus::Canceled);
        assert!(mock.get_subscription("sub_missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn signed_payloads_verify() {
        let mock = MockPaymentProvider::new();
        let payload = br#"{"id":"evt_1","type":"payment_intent.succeeded","created":1,"data":{"object":{"id":"pi_1","amount":500,"currency":"usd","status":"succeeded"}}}"#;
        let header = mock.sign_payload(payload).unwrap();

        let event = mock.verify_webhook(payload, &header).await.unwrap();
        assert_eq!(event.event_type, WebhookEventType::PaymentIntentSucceeded);
        assert!(matches!(
            event.data,
            WebhookEventData::PaymentIntent { amount: 500, .. }
        ));
    }

    #[tokio::test]
    async fn payload_signed_with_other_secret_is_rejected() {
        let mock = MockPaymentProvider::new();
        let other = MockPaymentProvider::with_webhook_secret("whsec_other");
        let payload = br#"{"id":"evt_1","type":"ping","created":1,"data":{"object":{}}}"#;
        let header = other.sign_payload(payload).unwrap();

        let err = mock.verify_webhook(payload, &header).await.unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::InvalidWebhook);
    }
}
