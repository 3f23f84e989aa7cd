//! Shared router state.

use std::sync::Arc;

use crate::application::handlers::auth::{LoginHandler, RefreshAccessTokenHandler, RegisterUserHandler};
use crate::application::handlers::billing::{
    CreateCustomerHandler, CreatePaymentIntentHandler, CreateSubscriptionHandler,
    HandlePaymentWebhookHandler,
};
use crate::application::handlers::email::{SendPasswordResetHandler, SendVerificationHandler};
use crate::application::handlers::plan::{
    CancelUserPlanHandler, CreatePlanHandler, DeletePlanHandler, SubscribeToPlanHandler,
    UpdatePlanHandler,
};
use crate::application::handlers::user::{SendWelcomeEmailHandler, UpdateUserHandler};
use crate::ports::{
    EmailSender, PasswordHasher, PaymentProvider, PlanRepository, SessionValidator,
    SubscriptionRepository, TokenService, UserRepository,
};

/// Name and version reported by `/health`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

/// Every port the handlers need, cloned cheaply per request.
#[derive(Clone)]
pub struct AppState {
    pub info: AppInfo,
    pub users: Arc<dyn UserRepository>,
    pub plans: Arc<dyn PlanRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenService>,
    pub sessions: Arc<dyn SessionValidator>,
    pub email: Arc<dyn EmailSender>,
    pub payments: Arc<dyn PaymentProvider>,
}

impl AppState {
    // ── Auth ───────────────────────────────────────────────────────────────

    pub fn register_user_handler(&self) -> RegisterUserHandler {
        RegisterUserHandler::new(self.users.clone(), self.hasher.clone())
    }

    pub fn login_handler(&self) -> LoginHandler {
        LoginHandler::new(self.users.clone(), self.hasher.clone(), self.tokens.clone())
    }

    pub fn refresh_handler(&self) -> RefreshAccessTokenHandler {
        RefreshAccessTokenHandler::new(self.users.clone(), self.tokens.clone())
    }

    // ── Users ──────────────────────────────────────────────────────────────

    pub fn update_user_handler(&self) -> UpdateUserHandler {
        UpdateUserHandler::new(self.users.clone())
    }

    pub fn welcome_email_handler(&self) -> SendWelcomeEmailHandler {
        SendWelcomeEmailHandler::new(self.users.clone(), self.email.clone())
    }

    // ── Plans ──────────────────────────────────────────────────────────────

    pub fn create_plan_handler(&self) -> CreatePlanHandler {
        CreatePlanHandler::new(self.plans.clone())
    }

    pub fn update_plan_handler(&self) -> UpdatePlanHandler {
        UpdatePlanHandler::new(self.plans.clone())
    }

    pub fn delete_plan_handler(&self) -> DeletePlanHandler {
        DeletePlanHandler::new(self.plans.clone())
    }

    pub fn subscribe_handler(&self) -> SubscribeToPlanHandler {
        SubscribeToPlanHandler::new(self.plans.clone(), self.subscriptions.clone())
    }

    pub fn cancel_plan_handler(&self) -> CancelUserPlanHandler {
        CancelUserPlanHandler::new(self.subscriptions.clone())
    }

    // ── Billing ────────────────────────────────────────────────────────────

    pub fn create_customer_handler(&self) -> CreateCustomerHandler {
        CreateCustomerHandler::new(self.users.clone(), self.payments.clone())
    }

    pub fn payment_intent_handler(&self) -> CreatePaymentIntentHandler {
        CreatePaymentIntentHandler::new(self.users.clone(), self.payments.clone())
    }

    pub fn create_subscription_handler(&self) -> CreateSubscriptionHandler {
        CreateSubscriptionHandler::new(self.users.clone(), self.payments.clone())
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(self.payments.clone(), self.subscriptions.clone())
    }

    // ── Email ──────────────────────────────────────────────────────────────

    pub fn password_reset_handler(&self) -> SendPasswordResetHandler {
        SendPasswordResetHandler::new(self.email.clone())
    }

    pub fn verification_handler(&self) -> SendVerificationHandler {
        SendVerificationHandler::new(self.users.clone(), self.email.clone())
    }
}
