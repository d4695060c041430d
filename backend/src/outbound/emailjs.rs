//! Reqwest-backed EmailJS confirmation mailer.
//!
//! EmailJS renders a stored template with the parameters sent here, so the
//! adapter only needs the service, template and public key identifiers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use super::http_support::body_preview;
use crate::domain::ContactConfirmation;
use crate::domain::ports::{ConfirmationMailer, ConfirmationMailerError};

/// Public EmailJS send endpoint.
pub const DEFAULT_EMAILJS_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Identifiers issued by EmailJS for one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailJsAccount {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct TemplateParams<'a> {
    to_email: &'a str,
    from_name: &'a str,
    to_name: &'a str,
    message: &'a str,
}

/// [`ConfirmationMailer`] posting to the EmailJS REST API.
pub struct EmailJsMailer {
    client: Client,
    endpoint: Url,
    account: EmailJsAccount,
}

impl EmailJsMailer {
    /// Build a mailer whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        account: EmailJsAccount,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            account,
        })
    }

    fn request<'a>(&'a self, confirmation: &'a ContactConfirmation) -> SendRequest<'a> {
        SendRequest {
            service_id: &self.account.service_id,
            template_id: &self.account.template_id,
            user_id: &self.account.public_key,
            template_params: TemplateParams {
                to_email: &confirmation.to_email,
                from_name: &confirmation.from_name,
                to_name: &confirmation.to_name,
                message: &confirmation.message,
            },
        }
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ConfirmationMailerError {
    ConfirmationMailerError::rejected(status.as_u16(), body_preview(body))
}

#[async_trait]
impl ConfirmationMailer for EmailJsMailer {
    async fn send(&self, confirmation: &ContactConfirmation) -> Result<(), ConfirmationMailerError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&self.request(confirmation))
            .send()
            .await
            .map_err(|err| ConfirmationMailerError::transport(err.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(map_status_error(status, &body))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network helpers.
    use std::time::Duration;

    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::ContactMessage;
    use crate::test_support::fixture_now;

    fn mailer() -> EmailJsMailer {
        EmailJsMailer::new(
            Url::parse(DEFAULT_EMAILJS_URL).expect("url"),
            EmailJsAccount {
                service_id: "service_eatopia".into(),
                template_id: "template_contact".into(),
                public_key: "pk_123".into(),
            },
            Duration::from_secs(5),
        )
        .expect("client")
    }

    #[rstest]
    fn request_carries_the_template_parameters() {
        let mailer = mailer();
        let message = ContactMessage::new("Ada", "ada@example.com", "Hi", fixture_now())
            .expect("valid message");
        let confirmation = ContactConfirmation::for_message(&message);

        let body = serde_json::to_value(mailer.request(&confirmation)).expect("serialise");

        assert_eq!(
            body,
            json!({
                "service_id": "service_eatopia",
                "template_id": "template_contact",
                "user_id": "pk_123",
                "template_params": {
                    "to_email": "ada@example.com",
                    "from_name": "Eatopia",
                    "to_name": "Ada",
                    "message": "Thank you for contacting us. We'll get back to you soon.",
                },
            })
        );
    }

    #[rstest]
    fn failed_sends_keep_status_and_body() {
        let err = map_status_error(StatusCode::BAD_REQUEST, b"The Public Key is invalid");

        assert_eq!(
            err,
            ConfirmationMailerError::rejected(400_u16, "The Public Key is invalid")
        );
    }
}
