//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port against the Stripe REST API:
//! customers, payment intents, subscriptions and the price catalogue.
//!
//! # Security
//!
//! - Webhook signatures use HMAC-SHA256 with constant-time comparison
//! - Timestamps older than five minutes are rejected to prevent replay
//! - Keys are held as `secrecy::Secret` and never logged

mod mock_payment_provider;
mod stripe_adapter;
mod types;
pub mod webhook;

pub use mock_payment_provider::{MethodCall, MockPaymentProvider, MOCK_WEBHOOK_SECRET};
pub use stripe_adapter::StripePaymentAdapter;
pub use types::{StripeCustomer, StripeEvent, StripePaymentIntent, StripePrice, StripeSubscription};
pub use webhook::{SignatureHeader, SignatureParseError, WebhookVerifier};
