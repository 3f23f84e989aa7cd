//! Email delivery adapters.

mod recording;
mod resend;

pub use recording::RecordingEmailSender;
pub use resend::ResendEmailSender;
