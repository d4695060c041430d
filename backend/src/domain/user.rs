//! User identity primitives.
//!
//! Accounts live in the external identity provider; the backend only ever
//! sees the provider's opaque user id, the account email and the display
//! name chosen at signup.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest user id the identity provider issues.
pub const USER_ID_MAX: usize = 128;

/// Longest display name accepted at signup.
pub const DISPLAY_NAME_MAX: usize = 100;

/// Validation errors raised by user primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The id was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The id contained whitespace or exceeded the length limit.
    #[error("user id must be at most {USER_ID_MAX} non-whitespace characters")]
    InvalidId,
    /// The email address was malformed.
    #[error("email must contain a local part and a domain")]
    InvalidEmail,
    /// The display name was blank or too long.
    #[error("display name must be 1 to {DISPLAY_NAME_MAX} characters")]
    InvalidDisplayName,
}

/// Opaque identifier issued by the identity provider.
///
/// # Examples
/// ```
/// use eatopia::domain::UserId;
///
/// let id = UserId::new("k3Jf9sQ2").expect("valid id");
/// assert_eq!(id.as_ref(), "k3Jf9sQ2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.chars().count() > USER_ID_MAX || id.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Generate a random identifier, used by fixtures and tests.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalised account email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trim and minimally validate an email address.
    ///
    /// The identity provider performs the authoritative check; this only
    /// rejects values that cannot possibly be addresses.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        match trimmed.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && domain.contains('.') && !domain.starts_with('.') =>
            {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(UserValidationError::InvalidEmail),
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Name shown for an account, trimmed and non-blank.
///
/// # Examples
/// ```
/// use eatopia::domain::DisplayName;
///
/// let name = DisplayName::new("  Ada Lovelace ").expect("valid name");
/// assert_eq!(name.as_ref(), "Ada Lovelace");
/// assert!(DisplayName::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() || trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::InvalidDisplayName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Authenticated account as reported by the identity provider.
///
/// Accounts created outside the signup form may have no display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    #[serde(default)]
    display_name: Option<DisplayName>,
    email: EmailAddress,
}

impl User {
    /// Build a user from validated parts.
    pub fn new(id: UserId, email: EmailAddress) -> Self {
        Self {
            id,
            display_name: None,
            email,
        }
    }

    /// Attach the account's display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: Option<DisplayName>) -> Self {
        self.display_name = display_name;
        self
    }

    /// Name chosen at signup, if the account has one.
    pub fn display_name(&self) -> Option<&DisplayName> {
        self.display_name.as_ref()
    }

    /// Provider-issued identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Account email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}
