//! Reqwest-backed Identity Toolkit adapter.
//!
//! Talks to the email/password endpoints of the Identity Toolkit REST API.
//! Sign-up sends the display name and account responses echo it back.
//! Error bodies carry a reason such as `EMAIL_NOT_FOUND`, which is mapped to
//! an [`AuthErrorCode`]; anything else becomes a transport or decode error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use super::http_support::status_message;
use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{
    AuthErrorCode, DisplayName, EmailAddress, LoginCredentials, SignupCredentials, User, UserId,
};

/// Public Identity Toolkit endpoint.
pub const DEFAULT_IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1/";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeRequest<'a> {
    request_type: &'static str,
    email: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    email: String,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// [`IdentityProvider`] backed by the Identity Toolkit REST API.
pub struct IdentityToolkitProvider {
    client: Client,
    base: Url,
    api_key: String,
}

impl IdentityToolkitProvider {
    /// Build an adapter whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            api_key,
        })
    }

    async fn call<B: Serialize + Sync>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<Vec<u8>, IdentityProviderError> {
        let url = self
            .base
            .join(&format!("./accounts:{method}"))
            .map_err(|err| IdentityProviderError::transport(err.to_string()))?;
        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|err| IdentityProviderError::transport(err.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| IdentityProviderError::transport(err.to_string()))?;
        if status.is_success() {
            Ok(bytes.to_vec())
        } else {
            Err(rejection(status, &bytes))
        }
    }

    async fn account(
        &self,
        method: &str,
        request: &PasswordRequest<'_>,
    ) -> Result<User, IdentityProviderError> {
        let body = self.call(method, request).await?;
        user_from_body(&body)
    }
}

fn rejection(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            IdentityProviderError::rejected(AuthErrorCode::from_provider_message(
                &envelope.error.message,
            ))
        }
        Err(_) => IdentityProviderError::transport(status_message(status, body)),
    }
}

fn user_from_body(body: &[u8]) -> Result<User, IdentityProviderError> {
    let account: AccountResponse = serde_json::from_slice(body)
        .map_err(|err| IdentityProviderError::decode(err.to_string()))?;
    let id = UserId::new(account.local_id)
        .map_err(|err| IdentityProviderError::decode(err.to_string()))?;
    let email = EmailAddress::new(&account.email)
        .map_err(|err| IdentityProviderError::decode(err.to_string()))?;
    // Accounts created elsewhere may carry an empty name.
    let display_name = account
        .display_name
        .and_then(|name| DisplayName::new(name).ok());
    Ok(User::new(id, email).with_display_name(display_name))
}

#[async_trait]
impl IdentityProvider for IdentityToolkitProvider {
    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<User, IdentityProviderError> {
        let request = PasswordRequest {
            email: credentials.email().as_ref(),
            password: credentials.password(),
            display_name: None,
            return_secure_token: true,
        };
        self.account("signInWithPassword", &request).await
    }

    async fn sign_up(&self, credentials: &SignupCredentials) -> Result<User, IdentityProviderError> {
        let request = PasswordRequest {
            email: credentials.email().as_ref(),
            password: credentials.password(),
            display_name: Some(credentials.display_name().as_ref()),
            return_secure_token: true,
        };
        self.account("signUp", &request).await
    }

    async fn send_password_reset(&self, email: &EmailAddress) -> Result<(), IdentityProviderError> {
        self.call(
            "sendOobCode",
            &OobCodeRequest {
                request_type: "PASSWORD_RESET",
                email: email.as_ref(),
            },
        )
        .await
        .map(drop)
    }
}
