//! Credential payloads accepted by the authentication flows.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{DisplayName, EmailAddress};

/// Shortest password the signup form accepts.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Credential validation failures. Messages are shown to users verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    #[error("Invalid email address.")]
    InvalidEmail,
    #[error("Please enter your name.")]
    InvalidDisplayName,
    #[error("Password must not be empty.")]
    EmptyPassword,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },
}

impl CredentialsValidationError {
    /// Request field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "email",
            Self::InvalidDisplayName => "displayName",
            Self::EmptyPassword | Self::PasswordTooShort { .. } => "password",
            Self::PasswordMismatch => "confirmPassword",
        }
    }
}

/// Email/password pair for signing in.
///
/// The password is wiped from memory on drop.
#[derive(Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl LoginCredentials {
    /// Validate raw form fields.
    ///
    /// # Examples
    /// ```
    /// use eatopia::domain::LoginCredentials;
    ///
    /// let creds = LoginCredentials::try_from_parts("diner@example.com", "secret")
    ///     .expect("valid credentials");
    /// assert_eq!(creds.email().as_ref(), "diner@example.com");
    /// ```
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email =
            EmailAddress::new(email).map_err(|_| CredentialsValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Account creation request with a confirmed password and display name.
#[derive(Clone)]
pub struct SignupCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
    display_name: DisplayName,
}

impl fmt::Debug for SignupCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupCredentials")
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl SignupCredentials {
    /// Validate the signup form: a non-blank name and matching passwords of
    /// at least [`PASSWORD_MIN_LENGTH`] characters.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        confirmation: &str,
        display_name: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let display_name = DisplayName::new(display_name)
            .map_err(|_| CredentialsValidationError::InvalidDisplayName)?;
        let email =
            EmailAddress::new(email).map_err(|_| CredentialsValidationError::InvalidEmail)?;
        if password != confirmation {
            return Err(CredentialsValidationError::PasswordMismatch);
        }
        if password.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(CredentialsValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LENGTH,
            });
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
            display_name,
        })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }
}
