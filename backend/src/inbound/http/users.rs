//! Account and session handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"diner@example.com","password":"password"}
//! POST /api/v1/signup {"email":"...","password":"...","confirmPassword":"...","displayName":"Ada"}
//! POST /api/v1/logout
//! POST /api/v1/password-reset {"email":"diner@example.com"}
//! GET /api/v1/users/me
//! ```
//!
//! Identity provider rejections surface with the user-facing message for
//! the flow and the `auth/*` code in `details.code`.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EmailAddress, LoginCredentials, SignupCredentials, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{credentials_validation_error, field_error};

/// Body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "diner@example.com")]
    pub email: String,
    pub password: String,
}

/// Body for `POST /api/v1/signup`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[schema(example = "diner@example.com")]
    pub email: String,
    #[schema(min_length = 6)]
    pub password: String,
    pub confirm_password: String,
    #[schema(example = "Ada Lovelace", max_length = 100)]
    pub display_name: String,
}

/// Body for `POST /api/v1/password-reset`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    #[schema(example = "diner@example.com")]
    pub email: String,
}

/// Sign in and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = UserSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Identity provider unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<User>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(credentials_validation_error)?;
    let user = state.auth.login(&credentials).await?;
    session.persist_user(&user)?;
    tracing::info!(user_id = %user.id(), "user signed in");
    Ok(web::Json(user))
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = UserSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Sign-up disabled", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Identity provider unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let SignupRequest {
        email,
        password,
        confirm_password,
        display_name,
    } = payload.into_inner();
    let credentials =
        SignupCredentials::try_from_parts(&email, &password, &confirm_password, &display_name)
            .map_err(credentials_validation_error)?;
    let user = state.auth.signup(&credentials).await?;
    session.persist_user(&user)?;
    tracing::info!(user_id = %user.id(), "account created");
    Ok(HttpResponse::Created().json(user))
}

/// End the session and close the user's live dashboard sockets.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Signed out"),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user = session.user()?;
    session.clear();
    if let Some(user) = user {
        state.sign_outs.notify(user.id());
        tracing::info!(user_id = %user.id(), "user signed out");
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Ask the identity provider to email a password reset link.
#[utoipa::path(
    post,
    path = "/api/v1/password-reset",
    request_body = PasswordResetRequest,
    responses(
        (status = 202, description = "Reset email requested"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unknown account", body = ErrorSchema),
        (status = 503, description = "Identity provider unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "requestPasswordReset",
    security([])
)]
#[post("/password-reset")]
pub async fn password_reset(
    state: web::Data<HttpState>,
    payload: web::Json<PasswordResetRequest>,
) -> ApiResult<HttpResponse> {
    let email = EmailAddress::new(&payload.email)
        .map_err(|_| field_error("email", "invalid_email", "Invalid email address."))?;
    state.auth.request_password_reset(&email).await?;
    Ok(HttpResponse::Accepted().finish())
}

/// The signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(session: SessionContext) -> ApiResult<web::Json<User>> {
    session.require_user().map(web::Json)
}

#[cfg(test)]
mod tests;
