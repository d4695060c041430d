//! Port for sending contact confirmation emails.

use async_trait::async_trait;

use crate::domain::ContactConfirmation;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mailer adapters.
    pub enum ConfirmationMailerError {
        /// The mail service could not be reached.
        Transport { message: String } => "mail transport failed: {message}",
        /// The mail service refused the message.
        Rejected { status: u16, message: String } =>
            "mail service rejected message with status {status}: {message}",
    }
}

/// Delivers confirmation emails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationMailer: Send + Sync {
    /// Send one confirmation.
    async fn send(&self, confirmation: &ContactConfirmation) -> Result<(), ConfirmationMailerError>;
}

/// Mailer used when no mail service is configured; sends nothing and
/// reports success.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureConfirmationMailer;

#[async_trait]
impl ConfirmationMailer for FixtureConfirmationMailer {
    async fn send(&self, _confirmation: &ContactConfirmation) -> Result<(), ConfirmationMailerError> {
        Ok(())
    }
}
