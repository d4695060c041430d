//! Identity provider error codes and the messages shown for them.
//!
//! Provider responses are normalised to `auth/*` codes first; the message
//! tables then depend only on the flow and the code.

use std::fmt;

/// Normalised identity error code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuthErrorCode {
    UserNotFound,
    WrongPassword,
    InvalidEmail,
    TooManyRequests,
    EmailAlreadyInUse,
    WeakPassword,
    OperationNotAllowed,
    /// Any code without a dedicated message.
    Other(String),
}

impl AuthErrorCode {
    /// Parse an `auth/*` code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "auth/user-not-found" => Self::UserNotFound,
            "auth/wrong-password" => Self::WrongPassword,
            "auth/invalid-email" => Self::InvalidEmail,
            "auth/too-many-requests" => Self::TooManyRequests,
            "auth/email-already-in-use" => Self::EmailAlreadyInUse,
            "auth/weak-password" => Self::WeakPassword,
            "auth/operation-not-allowed" => Self::OperationNotAllowed,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Translate an Identity Toolkit REST error message such as
    /// `"WEAK_PASSWORD : Password should be at least 6 characters"`.
    ///
    /// # Examples
    /// ```
    /// use eatopia::domain::AuthErrorCode;
    ///
    /// assert_eq!(
    ///     AuthErrorCode::from_provider_message("EMAIL_EXISTS"),
    ///     AuthErrorCode::EmailAlreadyInUse
    /// );
    /// ```
    pub fn from_provider_message(message: &str) -> Self {
        let reason = message
            .split([' ', ':'])
            .find(|part| !part.is_empty())
            .unwrap_or_default();
        match reason {
            "EMAIL_NOT_FOUND" => Self::UserNotFound,
            "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => Self::WrongPassword,
            "INVALID_EMAIL" => Self::InvalidEmail,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => Self::TooManyRequests,
            "EMAIL_EXISTS" => Self::EmailAlreadyInUse,
            "WEAK_PASSWORD" => Self::WeakPassword,
            "OPERATION_NOT_ALLOWED" => Self::OperationNotAllowed,
            other => Self::Other(format!(
                "auth/{}",
                other.to_ascii_lowercase().replace('_', "-")
            )),
        }
    }

    /// The `auth/*` code string.
    pub fn as_code(&self) -> &str {
        match self {
            Self::UserNotFound => "auth/user-not-found",
            Self::WrongPassword => "auth/wrong-password",
            Self::InvalidEmail => "auth/invalid-email",
            Self::TooManyRequests => "auth/too-many-requests",
            Self::EmailAlreadyInUse => "auth/email-already-in-use",
            Self::WeakPassword => "auth/weak-password",
            Self::OperationNotAllowed => "auth/operation-not-allowed",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Which form produced the error; each has its own message table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    Login,
    Signup,
}

impl AuthFlow {
    /// Message used when no specific text exists for a code.
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::Login => "An error occurred. Please try again.",
            Self::Signup => "An error occurred while creating your account. Please try again.",
        }
    }
}

/// User-facing message for `code` in `flow`.
pub fn auth_error_message(flow: AuthFlow, code: &AuthErrorCode) -> &'static str {
    match (flow, code) {
        (AuthFlow::Login, AuthErrorCode::UserNotFound) => "No account found with this email address.",
        (AuthFlow::Login, AuthErrorCode::WrongPassword) => "Incorrect password.",
        (AuthFlow::Login, AuthErrorCode::TooManyRequests) => {
            "Too many failed attempts. Please try again later."
        }
        (AuthFlow::Signup, AuthErrorCode::EmailAlreadyInUse) => {
            "An account with this email already exists."
        }
        (AuthFlow::Signup, AuthErrorCode::WeakPassword) => {
            "Password is too weak. Please choose a stronger password."
        }
        (AuthFlow::Signup, AuthErrorCode::OperationNotAllowed) => {
            "Email/password accounts are not enabled. Please contact support."
        }
        (_, AuthErrorCode::InvalidEmail) => "Invalid email address.",
        _ => flow.fallback_message(),
    }
}
