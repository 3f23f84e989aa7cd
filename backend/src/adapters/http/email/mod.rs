//! HTTP adapter for transactional and bulk email.

pub mod dto;
mod handlers;
mod routes;

pub use dto::{BulkEmailRequest, SendEmailRequest, TemplateEmailRequest};
pub use routes::email_routes;
