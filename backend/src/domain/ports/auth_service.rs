//! Driving port for sign-in, sign-up and password reset.
//!
//! Inbound adapters call this port to authenticate without knowing which
//! identity provider backs it, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Error, LoginCredentials, SignupCredentials, User};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Validate credentials and return the authenticated user.
    async fn login(&self, credentials: &LoginCredentials) -> Result<User, Error>;

    /// Create an account and return the new user, already signed in.
    async fn signup(&self, credentials: &SignupCredentials) -> Result<User, Error>;

    /// Request a password reset email.
    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), Error>;
}
