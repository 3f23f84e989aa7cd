//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `auth` - JWT tokens, bcrypt hashing, bearer session validation
//! - `email` - Resend delivery and a recording sender
//! - `http` - the axum REST surface
//! - `memory` - in-memory repositories
//! - `postgres` - sqlx repositories
//! - `stripe` - Stripe REST client, webhook verification and a mock provider

pub mod auth;
pub mod email;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
