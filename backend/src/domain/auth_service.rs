//! Authentication service over an identity provider.
//!
//! Provider rejections become domain errors carrying the user-facing message
//! for the flow and the normalised `auth/*` code in `details.code`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{AuthService, IdentityProvider, IdentityProviderError};
use crate::domain::{
    AuthErrorCode, AuthFlow, EmailAddress, Error, LoginCredentials, SignupCredentials, User,
    auth_error_message,
};

fn rejection_error(flow: AuthFlow, code: &AuthErrorCode) -> Error {
    let message = auth_error_message(flow, code);
    let error = match (flow, code) {
        (AuthFlow::Login, AuthErrorCode::InvalidEmail) => Error::invalid_request(message),
        (AuthFlow::Login, AuthErrorCode::TooManyRequests) => Error::service_unavailable(message),
        (AuthFlow::Login, _) => Error::unauthorized(message),
        (AuthFlow::Signup, AuthErrorCode::EmailAlreadyInUse) => Error::conflict(message),
        (AuthFlow::Signup, AuthErrorCode::OperationNotAllowed) => Error::forbidden(message),
        (AuthFlow::Signup, _) => Error::invalid_request(message),
    };
    error.with_details(json!({ "code": code.as_code() }))
}

fn map_provider_error(flow: AuthFlow, error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::Rejected { code } => rejection_error(flow, &code),
        IdentityProviderError::Transport { message } | IdentityProviderError::Decode { message } => {
            tracing::error!(?flow, %message, "identity provider unavailable");
            Error::service_unavailable(flow.fallback_message())
        }
    }
}

/// [`AuthService`] backed by an [`IdentityProvider`].
pub struct IdentityAuthService<P: ?Sized> {
    provider: Arc<P>,
}

impl<P: ?Sized> IdentityAuthService<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P> AuthService for IdentityAuthService<P>
where
    P: IdentityProvider + ?Sized,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        self.provider
            .sign_in(credentials)
            .await
            .map_err(|err| map_provider_error(AuthFlow::Login, err))
    }

    async fn signup(&self, credentials: &SignupCredentials) -> Result<User, Error> {
        self.provider
            .sign_up(credentials)
            .await
            .map_err(|err| map_provider_error(AuthFlow::Signup, err))
    }

    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), Error> {
        self.provider
            .send_password_reset(email)
            .await
            .map_err(|err| map_provider_error(AuthFlow::Login, err))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockIdentityProvider;

    fn login() -> LoginCredentials {
        LoginCredentials::try_from_parts("diner@example.com", "secret").expect("credentials")
    }

    fn signup() -> SignupCredentials {
        SignupCredentials::try_from_parts("diner@example.com", "secret1", "secret1", "Diner")
            .expect("credentials")
    }

    #[rstest]
    #[case(AuthErrorCode::UserNotFound, ErrorCode::Unauthorized, "No account found with this email address.")]
    #[case(AuthErrorCode::WrongPassword, ErrorCode::Unauthorized, "Incorrect password.")]
    #[case(AuthErrorCode::InvalidEmail, ErrorCode::InvalidRequest, "Invalid email address.")]
    #[case(
        AuthErrorCode::TooManyRequests,
        ErrorCode::ServiceUnavailable,
        "Too many failed attempts. Please try again later."
    )]
    #[case(
        AuthErrorCode::Other("auth/user-disabled".into()),
        ErrorCode::Unauthorized,
        "An error occurred. Please try again."
    )]
    #[tokio::test]
    async fn login_rejections_map_to_messages(
        #[case] code: AuthErrorCode,
        #[case] expected_code: ErrorCode,
        #[case] expected_message: &str,
    ) {
        let mut provider = MockIdentityProvider::new();
        let rejected = code.clone();
        provider
            .expect_sign_in()
            .return_once(move |_| Err(IdentityProviderError::rejected(rejected)));

        let error = IdentityAuthService::new(Arc::new(provider))
            .login(&login())
            .await
            .expect_err("rejected");

        assert_eq!(error.code(), expected_code);
        assert_eq!(error.message(), expected_message);
        assert_eq!(error.details(), Some(&json!({ "code": code.as_code() })));
    }

    #[rstest]
    #[case(AuthErrorCode::EmailAlreadyInUse, ErrorCode::Conflict)]
    #[case(AuthErrorCode::OperationNotAllowed, ErrorCode::Forbidden)]
    #[case(AuthErrorCode::WeakPassword, ErrorCode::InvalidRequest)]
    #[tokio::test]
    async fn signup_rejections_map_to_codes(#[case] code: AuthErrorCode, #[case] expected: ErrorCode) {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_sign_up()
            .return_once(move |_| Err(IdentityProviderError::rejected(code)));

        let error = IdentityAuthService::new(Arc::new(provider))
            .signup(&signup())
            .await
            .expect_err("rejected");

        assert_eq!(error.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn transport_failures_use_the_fallback_message() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_sign_up()
            .return_once(|_| Err(IdentityProviderError::transport("timed out")));

        let error = IdentityAuthService::new(Arc::new(provider))
            .signup(&signup())
            .await
            .expect_err("transport failure");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(
            error.message(),
            "An error occurred while creating your account. Please try again."
        );
    }
}
