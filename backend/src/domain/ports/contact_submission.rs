//! Driving port for contact form submissions.

use async_trait::async_trait;

use crate::domain::{ContactMessage, ContactOutcome, Error};

/// Accepts contact messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactSubmission: Send + Sync {
    /// Store `message`, then try to email a confirmation.
    ///
    /// Fails only when the message could not be stored; a failed email is
    /// reported through [`ContactOutcome::email_sent`].
    async fn submit(&self, message: ContactMessage) -> Result<ContactOutcome, Error>;
}

/// Fixture submission that reports full success.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureContactSubmission;

#[async_trait]
impl ContactSubmission for FixtureContactSubmission {
    async fn submit(&self, _message: ContactMessage) -> Result<ContactOutcome, Error> {
        Ok(ContactOutcome {
            stored: true,
            email_sent: true,
        })
    }
}
