//! Email domain: messages, templates and bulk-send reports.

mod message;
pub mod templates;

pub use message::{BulkSendReport, EmailMessage, MAX_BULK_RECIPIENTS};
pub use templates::{Branding, TemplateName};
