//! Billing handlers backed by the payment provider.

mod create_customer;
mod handle_payment_webhook;
mod start_payment;

pub use create_customer::{CreateCustomerCommand, CreateCustomerHandler, CreateCustomerResult};
pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
};
pub use start_payment::{
    CreatePaymentIntentCommand, CreatePaymentIntentHandler, CreateSubscriptionCommand,
    CreateSubscriptionHandler,
};
