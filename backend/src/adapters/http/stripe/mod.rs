//! HTTP adapter for Stripe payments, subscriptions and webhooks.

pub mod dto;
mod handlers;
mod routes;

pub use dto::{PaymentIntentRequest, SubscriptionRequest};
pub use routes::stripe_routes;
