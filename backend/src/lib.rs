//! SaaS API - accounts, plans, Stripe billing and transactional email.
//!
//! Layout follows ports and adapters:
//! - [`domain`] - entities, value objects and validation, no I/O
//! - [`ports`] - traits for storage, tokens, email and payments
//! - [`application`] - command handlers that orchestrate the ports
//! - [`adapters`] - HTTP, PostgreSQL, in-memory, Stripe, Resend and JWT implementations

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
