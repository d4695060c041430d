//! Port for the external identity provider.
//!
//! Accounts, password storage and reset emails belong to the provider. The
//! adapter only translates requests and normalises rejection codes to
//! [`AuthErrorCode`]s.

use async_trait::async_trait;

use crate::domain::{
    AuthErrorCode, DisplayName, EmailAddress, LoginCredentials, SignupCredentials, User, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The provider refused the request.
        Rejected { code: AuthErrorCode } => "identity provider rejected request: {code}",
        /// The provider could not be reached.
        Transport { message: String } => "identity provider transport failed: {message}",
        /// The provider answered with something unexpected.
        Decode { message: String } => "identity provider response invalid: {message}",
    }
}

/// Email/password identity operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify credentials.
    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<User, IdentityProviderError>;

    /// Create an account.
    async fn sign_up(&self, credentials: &SignupCredentials) -> Result<User, IdentityProviderError>;

    /// Ask the provider to email a password reset link.
    async fn send_password_reset(&self, email: &EmailAddress) -> Result<(), IdentityProviderError>;
}

/// Offline provider used when no API key is configured.
///
/// `diner@example.com` / `password` signs in as "Fixture Diner"; signups
/// succeed unless the address is that fixture account.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityProvider;

impl FixtureIdentityProvider {
    pub const EMAIL: &'static str = "diner@example.com";
    pub const PASSWORD: &'static str = "password";
    pub const USER_ID: &'static str = "fixture-diner";
    pub const DISPLAY_NAME: &'static str = "Fixture Diner";

    fn fixture_user() -> Result<User, IdentityProviderError> {
        let id = UserId::new(Self::USER_ID)
            .map_err(|err| IdentityProviderError::decode(err.to_string()))?;
        let email = EmailAddress::new(Self::EMAIL)
            .map_err(|err| IdentityProviderError::decode(err.to_string()))?;
        let name = DisplayName::new(Self::DISPLAY_NAME)
            .map_err(|err| IdentityProviderError::decode(err.to_string()))?;
        Ok(User::new(id, email).with_display_name(Some(name)))
    }
}

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<User, IdentityProviderError> {
        if credentials.email().as_ref() != Self::EMAIL {
            return Err(IdentityProviderError::rejected(AuthErrorCode::UserNotFound));
        }
        if credentials.password() != Self::PASSWORD {
            return Err(IdentityProviderError::rejected(AuthErrorCode::WrongPassword));
        }
        Self::fixture_user()
    }

    async fn sign_up(&self, credentials: &SignupCredentials) -> Result<User, IdentityProviderError> {
        if credentials.email().as_ref() == Self::EMAIL {
            return Err(IdentityProviderError::rejected(
                AuthErrorCode::EmailAlreadyInUse,
            ));
        }
        Ok(User::new(UserId::random(), credentials.email().clone())
            .with_display_name(Some(credentials.display_name().clone())))
    }

    async fn send_password_reset(&self, _email: &EmailAddress) -> Result<(), IdentityProviderError> {
        Ok(())
    }
}
