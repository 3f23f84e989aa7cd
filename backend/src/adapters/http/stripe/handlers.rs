//! HTTP handlers for Stripe billing endpoints.

use axum::body::Bytes;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::billing::{
    CreateCustomerCommand, CreatePaymentIntentCommand, CreateSubscriptionCommand,
    HandlePaymentWebhookCommand,
};
use crate::domain::foundation::ErrorCode;

use super::super::error::ApiError;
use super::super::middleware::RequireAuth;
use super::super::state::AppState;
use super::dto::{
    CancelSubscriptionResponse, CustomerResponse, PaymentIntentRequest, PriceListResponse,
    SubscriptionRequest, WebhookResponse,
};

const SIGNATURE_HEADER: &str = "stripe-signature";

/// POST /api/v1/stripe/payment-intent
pub async fn create_payment_intent(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Json(request): Json<PaymentIntentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let intent = state
        .payment_intent_handler()
        .handle(CreatePaymentIntentCommand {
            user_id: caller.id,
            amount: request.amount,
            currency: request.currency,
            metadata: request.metadata,
        })
        .await?;
    Ok(Json(intent))
}

/// POST /api/v1/stripe/customer
pub async fn create_customer(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .create_customer_handler()
        .handle(CreateCustomerCommand { user_id: caller.id })
        .await?;

    let message = if result.created {
        "Customer created successfully"
    } else {
        "Customer already exists"
    };
    Ok((
        StatusCode::CREATED,
        Json(CustomerResponse {
            customer_id: result.customer_id,
            message: message.to_string(),
        }),
    ))
}

/// POST /api/v1/stripe/subscription
pub async fn create_subscription(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Json(request): Json<SubscriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let subscription = state
        .create_subscription_handler()
        .handle(CreateSubscriptionCommand {
            user_id: caller.id,
            price_id: request.price_id,
            trial_days: request.trial_days,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(subscription)))
}

/// GET /api/v1/stripe/subscription/:id
pub async fn get_subscription(
    State(state): State<AppState>,
    RequireAuth(_caller): RequireAuth,
    Path(subscription_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let subscription = state
        .payments
        .get_subscription(&subscription_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(ErrorCode::SubscriptionNotFound, "Subscription not found")
        })?;
    Ok(Json(subscription))
}

/// DELETE /api/v1/stripe/subscription/:id - cancels immediately
pub async fn cancel_subscription(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(subscription_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let subscription = state.payments.cancel_subscription(&subscription_id).await?;
    tracing::info!(user_id = %caller.id, subscription_id = %subscription.id, "subscription cancelled");
    Ok(Json(CancelSubscriptionResponse {
        message: "Subscription cancelled successfully".to_string(),
        subscription,
    }))
}

/// GET /api/v1/stripe/prices
pub async fn list_prices(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let prices = state.payments.list_prices().await?;
    Ok(Json(PriceListResponse { prices }))
}

/// POST /api/v1/stripe/webhook
///
/// Takes the raw body: the signature covers the exact bytes Stripe sent.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::bad_request("stripe-signature", "Missing Stripe-Signature header"))?
        .to_string();

    let outcome = state
        .webhook_handler()
        .handle(HandlePaymentWebhookCommand {
            payload: body.to_vec(),
            signature,
        })
        .await?;
    tracing::debug!(?outcome, "webhook processed");
    Ok(Json(WebhookResponse { status: "success" }))
}
