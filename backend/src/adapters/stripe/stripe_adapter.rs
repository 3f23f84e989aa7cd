//! Stripe payment provider adapter.
//!
//! Talks to the Stripe REST API with form-encoded requests and basic auth.
//! Webhook verification is delegated to [`WebhookVerifier`].
//!
//! ```ignore
//! let adapter = StripePaymentAdapter::from_config(&config.payment)?;
//! let prices = adapter.list_prices().await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;

use crate::config::PaymentConfig;
use crate::domain::foundation::Timestamp;
use crate::ports::{
    CreateCustomerRequest, CreatePaymentIntentRequest, CreateSubscriptionRequest, Customer,
    PaymentError, PaymentErrorCode, PaymentIntent, PaymentProvider, Price, Subscription,
    SubscriptionStatus, WebhookEvent,
};

use super::types::{
    StripeCustomer, StripeErrorBody, StripeList, StripePaymentIntent, StripePrice,
    StripeSubscription,
};
use super::webhook::{parse_event, WebhookVerifier};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Largest page Stripe serves for list endpoints.
const PRICE_PAGE_LIMIT: &str = "100";

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    api_key: Secret<String>,
    api_base_url: String,
    verifier: WebhookVerifier,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    pub fn new(
        api_key: Secret<String>,
        webhook_secret: Secret<String>,
        api_base_url: impl Into<String>,
    ) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PaymentError::provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            verifier: WebhookVerifier::new(webhook_secret),
            http_client,
        })
    }

    pub fn from_config(config: &PaymentConfig) -> Result<Self, PaymentError> {
        Self::new(
            config.stripe_api_key.clone(),
            config.stripe_webhook_secret.clone(),
            config.stripe_api_base_url.clone(),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> Result<T, PaymentError> {
        let response = request
            .basic_auth(self.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(operation, error = %e, "Stripe request failed");
                PaymentError::network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = map_api_error(status, &body);
            tracing::error!(operation, %status, code = %error.code, "Stripe API error");
            return Err(error);
        }

        response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

/// Translates a non-2xx response into a [`PaymentError`].
fn map_api_error(status: reqwest::StatusCode, body: &str) -> PaymentError {
    let detail = serde_json::from_str::<StripeErrorBody>(body).ok().map(|b| b.error);
    let message = detail
        .as_ref()
        .and_then(|d| d.message.clone())
        .unwrap_or_else(|| format!("Stripe API error ({})", status));

    let code = match status.as_u16() {
        401 => PaymentErrorCode::AuthenticationError,
        402 => PaymentErrorCode::CardDeclined,
        404 => PaymentErrorCode::NotFound,
        429 => PaymentErrorCode::RateLimitExceeded,
        400 => match detail.as_ref().and_then(|d| d.error_type.as_deref()) {
            Some("card_error") => PaymentErrorCode::CardDeclined,
            _ => PaymentErrorCode::InvalidRequest,
        },
        _ => PaymentErrorCode::ProviderError,
    };

    let error = PaymentError::new(code, message);
    match detail.and_then(|d| d.code) {
        Some(provider_code) => error.with_provider_code(provider_code),
        None => error,
    }
}

fn to_subscription(sub: StripeSubscription) -> Subscription {
    Subscription {
        status: SubscriptionStatus::from_provider(&sub.status),
        id: sub.id,
        customer_id: sub.customer,
        current_period_start: sub.current_period_start,
        current_period_end: sub.current_period_end,
        cancel_at_period_end: sub.cancel_at_period_end,
        canceled_at: sub.canceled_at,
    }
}

fn to_price(price: StripePrice) -> Price {
    Price {
        product: price.product_id(),
        id: price.id,
        nickname: price.nickname,
        unit_amount: price.unit_amount,
        currency: price.currency,
        recurring_interval: price.recurring.map(|r| r.interval),
        active: price.active,
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError> {
        let mut params = vec![
            ("email", request.email.clone()),
            ("metadata[user_id]", request.user_id.to_string()),
        ];
        if let Some(name) = &request.name {
            params.push(("name", name.clone()));
        }

        let mut builder = self.http_client.post(self.url("customers")).form(&params);
        if let Some(key) = &request.idempotency_key {
            builder = builder.header("Idempotency-Key", key);
        }

        let customer: StripeCustomer = self.send(builder, "create_customer").await?;

        Ok(Customer {
            id: customer.id,
            email: customer.email.unwrap_or(request.email),
            name: customer.name.or(request.name),
            created_at: customer.created,
        })
    }

    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        if request.amount <= 0 {
            return Err(PaymentError::invalid_request("Amount must be positive"));
        }

        let mut params = vec![
            ("amount".to_string(), request.amount.to_string()),
            ("currency".to_string(), request.currency.to_lowercase()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];
        if let Some(customer) = &request.customer_id {
            params.push(("customer".to_string(), customer.clone()));
        }
        for (key, value) in &request.metadata {
            params.push((format!("metadata[{}]", key), value.clone()));
        }

        let builder = self
            .http_client
            .post(self.url("payment_intents"))
            .form(&params);
        let intent: StripePaymentIntent = self.send(builder, "create_payment_intent").await?;

        Ok(PaymentIntent {
            id: intent.id,
            client_secret: intent.client_secret,
            amount: intent.amount,
            currency: intent.currency,
            status: intent.status,
        })
    }

    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<Subscription, PaymentError> {
        let mut params = vec![
            ("customer".to_string(), request.customer_id.clone()),
            ("items[0][price]".to_string(), request.price_id.clone()),
        ];
        if request.trial_days > 0 {
            params.push((
                "trial_period_days".to_string(),
                request.trial_days.to_string(),
            ));
        }
        for (key, value) in &request.metadata {
            params.push((format!("metadata[{}]", key), value.clone()));
        }

        let builder = self
            .http_client
            .post(self.url("subscriptions"))
            .form(&params);
        let sub: StripeSubscription = self.send(builder, "create_subscription").await?;

        Ok(to_subscription(sub))
    }

    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Subscription>, PaymentError> {
        let builder = self
            .http_client
            .get(self.url(&format!("subscriptions/{}", subscription_id)));

        match self.send::<StripeSubscription>(builder, "get_subscription").await {
            Ok(sub) => Ok(Some(to_subscription(sub))),
            Err(e) if e.code == PaymentErrorCode::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Subscription, PaymentError> {
        let builder = self
            .http_client
            .delete(self.url(&format!("subscriptions/{}", subscription_id)));
        let sub: StripeSubscription = self.send(builder, "cancel_subscription").await?;

        Ok(to_subscription(sub))
    }

    async fn list_prices(&self) -> Result<Vec<Price>, PaymentError> {
        let builder = self
            .http_client
            .get(self.url("prices"))
            .query(&[("active", "true"), ("limit", PRICE_PAGE_LIMIT)]);
        let list: StripeList<StripePrice> = self.send(builder, "list_prices").await?;

        if list.has_more {
            tracing::warn!("more than {} active prices; list truncated", PRICE_PAGE_LIMIT);
        }

        Ok(list.data.into_iter().map(to_price).collect())
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        self.verifier
            .verify(payload, signature, Timestamp::now().as_unix_secs())?;
        let event = parse_event(payload)?;

        tracing::info!(
            event_id = %event.id,
            event_type = ?event.event_type,
            "webhook signature verified"
        );

        Ok(event)
    }
}

impl std::fmt::Debug for StripePaymentAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripePaymentAdapter")
            .field("api_base_url", &self.api_base_url)
            .finish_non_exhaustive()
    }
}
