//! Contact submission: persist, then best-effort confirmation email.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    ConfirmationMailer, ContactRepository, ContactRepositoryError, ContactSubmission,
};
use crate::domain::{
    CONTACT_FAILURE_MESSAGE, ContactConfirmation, ContactMessage, ContactOutcome, Error,
};

fn map_repository_error(error: &ContactRepositoryError) -> Error {
    tracing::error!(kind = error.kind(), error = %error, "failed to store contact message");
    match error {
        ContactRepositoryError::Connection { .. } => {
            Error::service_unavailable(CONTACT_FAILURE_MESSAGE)
        }
        ContactRepositoryError::Query { .. } => Error::internal(CONTACT_FAILURE_MESSAGE),
    }
}

/// [`ContactSubmission`] over a repository and a mailer.
pub struct ContactService<R: ?Sized, M: ?Sized> {
    repository: Arc<R>,
    mailer: Arc<M>,
}

impl<R: ?Sized, M: ?Sized> ContactService<R, M> {
    pub fn new(repository: Arc<R>, mailer: Arc<M>) -> Self {
        Self { repository, mailer }
    }
}

#[async_trait]
impl<R, M> ContactSubmission for ContactService<R, M>
where
    R: ContactRepository + ?Sized,
    M: ConfirmationMailer + ?Sized,
{
    async fn submit(&self, message: ContactMessage) -> Result<ContactOutcome, Error> {
        self.repository
            .save(&message)
            .await
            .map_err(|err| map_repository_error(&err))?;

        let confirmation = ContactConfirmation::for_message(&message);
        let email_sent = match self.mailer.send(&confirmation).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(kind = err.kind(), error = %err, "contact stored but confirmation email failed");
                false
            }
        };

        Ok(ContactOutcome {
            stored: true,
            email_sent,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Utc;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        ConfirmationMailerError, MockConfirmationMailer, MockContactRepository,
    };

    #[fixture]
    fn message() -> ContactMessage {
        ContactMessage::new("Ada", "ada@example.com", "Table for two?", Utc::now())
            .expect("valid contact")
    }

    #[rstest]
    #[tokio::test]
    async fn stores_then_confirms(message: ContactMessage) {
        let mut repo = MockContactRepository::new();
        repo.expect_save().times(1).return_once(|_| Ok(()));
        let mut mailer = MockConfirmationMailer::new();
        mailer
            .expect_send()
            .withf(|confirmation| {
                confirmation.to_email == "ada@example.com" && confirmation.from_name == "Eatopia"
            })
            .times(1)
            .return_once(|_| Ok(()));

        let outcome = ContactService::new(Arc::new(repo), Arc::new(mailer))
            .submit(message)
            .await
            .expect("stored");

        assert_eq!(
            outcome,
            ContactOutcome {
                stored: true,
                email_sent: true
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn mail_failure_keeps_the_stored_message(message: ContactMessage) {
        let mut repo = MockContactRepository::new();
        repo.expect_save().times(1).return_once(|_| Ok(()));
        let mut mailer = MockConfirmationMailer::new();
        mailer
            .expect_send()
            .return_once(|_| Err(ConfirmationMailerError::rejected(400_u16, "bad template")));

        let outcome = ContactService::new(Arc::new(repo), Arc::new(mailer))
            .submit(message)
            .await
            .expect("stored even though mail failed");

        assert!(outcome.stored);
        assert!(!outcome.email_sent);
        assert_eq!(outcome.status_message(), "Message saved, but email failed.");
    }

    #[rstest]
    #[tokio::test]
    async fn storage_failure_skips_the_email(message: ContactMessage) {
        let mut repo = MockContactRepository::new();
        repo.expect_save()
            .return_once(|_| Err(ContactRepositoryError::connection("refused")));
        let mut mailer = MockConfirmationMailer::new();
        mailer.expect_send().times(0);

        let error = ContactService::new(Arc::new(repo), Arc::new(mailer))
            .submit(message)
            .await
            .expect_err("not stored");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(error.message(), CONTACT_FAILURE_MESSAGE);
    }
}
