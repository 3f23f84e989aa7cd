//! HTTP DTOs for Stripe billing endpoints.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ports::{Price, Subscription};

fn default_currency() -> String {
    "usd".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntentRequest {
    /// Smallest currency unit.
    pub amount: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionRequest {
    pub price_id: String,
    #[serde(default)]
    pub trial_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerResponse {
    pub customer_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancelSubscriptionResponse {
    pub message: String,
    pub subscription: Subscription,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceListResponse {
    pub prices: Vec<Price>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
}
