//! Axum router for Stripe endpoints, mounted at `/api/v1/stripe`.

use axum::routing::{get, post};
use axum::Router;

use super::super::state::AppState;
use super::handlers::{
    cancel_subscription, create_customer, create_payment_intent, create_subscription,
    get_subscription, list_prices, webhook,
};

/// `/webhook` and `/prices` are public; the webhook authenticates by signature.
pub fn stripe_routes() -> Router<AppState> {
    Router::new()
        .route("/payment-intent", post(create_payment_intent))
        .route("/customer", post(create_customer))
        .route("/subscription", post(create_subscription))
        .route(
            "/subscription/:id",
            get(get_subscription).delete(cancel_subscription),
        )
        .route("/prices", get(list_prices))
        .route("/webhook", post(webhook))
}
