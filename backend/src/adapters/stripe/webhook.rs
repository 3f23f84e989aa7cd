//! Stripe webhook signature verification and event mapping.
//!
//! The `Stripe-Signature` header carries `t=<unix>,v1=<hex hmac>`. The HMAC is
//! SHA-256 over `"{t}.{payload}"` keyed by the endpoint secret. Events older
//! than five minutes, or more than a minute in the future, are rejected.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::ports::{
    PaymentError, SubscriptionStatus, WebhookEvent, WebhookEventData, WebhookEventType,
};

use super::types::{StripeEvent, StripePaymentIntent, StripeSubscription};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age for webhook events (5 minutes).
pub const MAX_TIMESTAMP_AGE_SECS: i64 = 300;

/// Clock skew tolerance for future timestamps.
pub const MAX_FUTURE_TOLERANCE_SECS: i64 = 60;

/// Error parsing the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureParseError {
    #[error("Missing Stripe-Signature header")]
    MissingHeader,
    #[error("Malformed signature component")]
    MalformedComponent,
    #[error("Missing timestamp (t=) in signature")]
    MissingTimestamp,
    #[error("Missing v1 signature in header")]
    MissingV1Signature,
    #[error("Invalid timestamp format")]
    InvalidTimestamp,
    #[error("Invalid signature format (not valid hex)")]
    InvalidSignatureFormat,
}

/// Parsed Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    /// Every `v1` entry; Stripe sends several while a secret is being rolled.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    pub fn parse(header: &str) -> Result<Self, SignatureParseError> {
        if header.trim().is_empty() {
            return Err(SignatureParseError::MissingHeader);
        }

        let mut timestamp = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or(SignatureParseError::MalformedComponent)?;

            match key.trim() {
                "t" => {
                    timestamp = Some(
                        value
                            .trim()
                            .parse()
                            .map_err(|_| SignatureParseError::InvalidTimestamp)?,
                    );
                }
                "v1" => {
                    let bytes = hex::decode(value.trim())
                        .map_err(|_| SignatureParseError::InvalidSignatureFormat)?;
                    v1_signatures.push(bytes);
                }
                // v0 and unknown schemes are ignored
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or(SignatureParseError::MissingTimestamp)?;
        if v1_signatures.is_empty() {
            return Err(SignatureParseError::MissingV1Signature);
        }

        Ok(Self {
            timestamp,
            v1_signatures,
        })
    }
}

/// Verifies signed webhook payloads for one endpoint secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: Secret<String>,
}

impl WebhookVerifier {
    pub fn new(secret: Secret<String>) -> Self {
        Self { secret }
    }

    fn mac_for(&self, timestamp: i64, payload: &[u8]) -> Result<HmacSha256, PaymentError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| PaymentError::provider(format!("Invalid webhook secret: {}", e)))?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(mac)
    }

    /// Builds a header value for `payload`; what Stripe would send.
    pub fn sign(&self, timestamp: i64, payload: &[u8]) -> Result<String, PaymentError> {
        let digest = self.mac_for(timestamp, payload)?.finalize().into_bytes();
        Ok(format!("t={},v1={}", timestamp, hex::encode(digest)))
    }

    /// Checks the signature header against `payload` at time `now`.
    pub fn verify(&self, payload: &[u8], signature: &str, now: i64) -> Result<(), PaymentError> {
        let header = SignatureHeader::parse(signature).map_err(|e| {
            tracing::warn!(error = %e, "failed to parse Stripe-Signature header");
            PaymentError::invalid_webhook(e.to_string())
        })?;

        let age = now - header.timestamp;
        if age > MAX_TIMESTAMP_AGE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                age_secs = age,
                "webhook event too old"
            );
            return Err(PaymentError::invalid_webhook(format!(
                "Event too old ({} seconds)",
                age
            )));
        }
        if age < -MAX_FUTURE_TOLERANCE_SECS {
            tracing::warn!(event_timestamp = header.timestamp, "webhook event from the future");
            return Err(PaymentError::invalid_webhook("Event timestamp in future"));
        }

        let expected = self
            .mac_for(header.timestamp, payload)?
            .finalize()
            .into_bytes();

        let matched = header
            .v1_signatures
            .iter()
            .any(|provided| bool::from(expected.as_slice().ct_eq(provided.as_slice())));

        if !matched {
            tracing::warn!("invalid webhook signature");
            return Err(PaymentError::invalid_webhook("Invalid signature"));
        }

        Ok(())
    }
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier").finish_non_exhaustive()
    }
}

/// Parses a verified payload into the port's event type.
pub fn parse_event(payload: &[u8]) -> Result<WebhookEvent, PaymentError> {
    let event: StripeEvent = serde_json::from_slice(payload).map_err(|e| {
        tracing::warn!(error = %e, "failed to parse webhook payload");
        PaymentError::invalid_webhook(format!("Invalid JSON: {}", e))
    })?;

    let event_type = WebhookEventType::from_provider(&event.event_type);
    let data = match &event_type {
        WebhookEventType::PaymentIntentSucceeded => {
            let intent: StripePaymentIntent = serde_json::from_value(event.data.object.clone())
                .map_err(|e| PaymentError::invalid_webhook(format!("Invalid payment intent: {}", e)))?;
            WebhookEventData::PaymentIntent {
                payment_intent_id: intent.id,
                customer_id: intent.customer,
                amount: intent.amount,
                currency: intent.currency,
            }
        }
        WebhookEventType::SubscriptionCreated | WebhookEventType::SubscriptionDeleted => {
            let sub: StripeSubscription = serde_json::from_value(event.data.object.clone())
                .map_err(|e| PaymentError::invalid_webhook(format!("Invalid subscription: {}", e)))?;
            WebhookEventData::Subscription {
                subscription_id: sub.id,
                customer_id: sub.customer,
                status: SubscriptionStatus::from_provider(&sub.status),
                user_id: sub.metadata.get("user_id").cloned(),
            }
        }
        WebhookEventType::Unknown(_) => WebhookEventData::Raw {
            json: event.data.object.to_string(),
        },
    };

    Ok(WebhookEvent {
        id: event.id,
        event_type,
        data,
        created_at: event.created,
    })
}
