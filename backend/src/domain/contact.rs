//! Contact form messages and their confirmation email.
//!
//! Storing a message and emailing a confirmation are independent operations:
//! the message is kept even when the email cannot be sent.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::user::EmailAddress;

/// Sender name used on confirmation emails.
pub const CONFIRMATION_FROM_NAME: &str = "Eatopia";
/// Body of every confirmation email.
pub const CONFIRMATION_MESSAGE: &str = "Thank you for contacting us. We'll get back to you soon.";
/// Shown when the message could not be stored.
pub const CONTACT_FAILURE_MESSAGE: &str = "Something went wrong. Try again.";

/// Contact form validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("email address is invalid")]
    InvalidEmail,
    #[error("message must not be empty")]
    EmptyMessage,
}

impl ContactValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::InvalidEmail => "email",
            Self::EmptyMessage => "message",
        }
    }
}

/// A submitted contact message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    name: String,
    email: EmailAddress,
    message: String,
    created_at: DateTime<Utc>,
}

impl ContactMessage {
    /// Validate form input received at `created_at`.
    pub fn new(
        name: &str,
        email: &str,
        message: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ContactValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ContactValidationError::EmptyName);
        }
        let email = EmailAddress::new(email).map_err(|_| ContactValidationError::InvalidEmail)?;
        if message.trim().is_empty() {
            return Err(ContactValidationError::EmptyMessage);
        }
        Ok(Self {
            name: name.to_owned(),
            email,
            message: message.to_owned(),
            created_at,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Template variables of the confirmation email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactConfirmation {
    pub to_email: String,
    pub to_name: String,
    pub from_name: String,
    pub message: String,
}

impl ContactConfirmation {
    /// Confirmation addressed to the sender of `contact`.
    pub fn for_message(contact: &ContactMessage) -> Self {
        Self {
            to_email: contact.email.to_string(),
            to_name: contact.name.clone(),
            from_name: CONFIRMATION_FROM_NAME.to_owned(),
            message: CONFIRMATION_MESSAGE.to_owned(),
        }
    }
}

/// Result of a contact submission; the two flags fail independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactOutcome {
    pub stored: bool,
    pub email_sent: bool,
}

impl ContactOutcome {
    /// Status line shown to the sender.
    pub const fn status_message(self) -> &'static str {
        match (self.stored, self.email_sent) {
            (true, true) => "Thanks! Please check your email for confirmation.",
            (true, false) => "Message saved, but email failed.",
            (false, _) => CONTACT_FAILURE_MESSAGE,
        }
    }
}
