//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! ## Persistence
//!
//! - `UserRepository`, `PlanRepository`, `SubscriptionRepository`
//!
//! ## Authentication
//!
//! - `PasswordHasher` - credential hashing
//! - `TokenService` - access/refresh token signing and verification
//! - `SessionValidator` - bearer token → authenticated user (used by middleware)
//!
//! ## Outbound services
//!
//! - `EmailSender` - transactional and bulk email
//! - `PaymentProvider` - Stripe-style billing

mod email_sender;
mod password_hasher;
mod payment_provider;
mod plan_repository;
mod session_validator;
mod subscription_repository;
mod token_service;
mod user_repository;

pub use email_sender::{EmailError, EmailSender};
pub use password_hasher::PasswordHasher;
pub use payment_provider::{
    CreateCustomerRequest, CreatePaymentIntentRequest, CreateSubscriptionRequest, Customer,
    PaymentError, PaymentErrorCode, PaymentIntent, PaymentProvider, Price, Subscription,
    SubscriptionStatus, WebhookEvent, WebhookEventData, WebhookEventType,
};
pub use plan_repository::PlanRepository;
pub use session_validator::SessionValidator;
pub use subscription_repository::SubscriptionRepository;
pub use token_service::{IssuedToken, TokenClaims, TokenKind, TokenService, TokenSubject};
pub use user_repository::UserRepository;
