//! OpenAPI schema definitions for domain types that do not derive
//! `ToSchema` themselves.
//!
//! The wrappers mirror the serialised shape of their domain counterparts
//! and exist only for documentation.

use chrono::{DateTime, Utc};
use utoipa::ToSchema;

use crate::domain::ExperienceStats;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A dependency is unavailable; retrying later may help.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "Failed to load experiences")]
    message: String,
    #[schema(example = "6f1c1c8e-2b1d-4f43-9a53-2d1c9a0b7e11")]
    trace_id: Option<String>,
    /// Usually `{ "field": ..., "code": ... }`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UserSchema {
    #[schema(example = "k3Jf9sQ2")]
    id: String,
    /// Absent for accounts created without a name.
    #[schema(example = "Ada Lovelace")]
    display_name: Option<String>,
    #[schema(example = "diner@example.com")]
    email: String,
}

/// OpenAPI schema for [`crate::domain::ExperienceStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ExperienceStatus)]
pub enum ExperienceStatusSchema {
    #[schema(rename = "upcoming")]
    Upcoming,
    #[schema(rename = "completed")]
    Completed,
    #[schema(rename = "cancelled")]
    Cancelled,
}

/// OpenAPI schema for [`crate::domain::DiningExperience`].
#[derive(ToSchema)]
#[schema(as = crate::domain::DiningExperience)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct DiningExperienceSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    user_id: String,
    #[schema(example = "Anniversary dinner")]
    name: String,
    restaurant: String,
    location: String,
    date: DateTime<Utc>,
    #[schema(minimum = 1, maximum = 5)]
    rating: Option<u8>,
    notes: Option<String>,
    cuisine: Option<String>,
    #[schema(example = "$$")]
    price_range: Option<String>,
    #[schema(minimum = 1)]
    guests: Option<u16>,
    status: ExperienceStatusSchema,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// OpenAPI schema for [`crate::domain::ExperienceViewState`], the payload
/// pushed over the experiences WebSocket.
#[derive(ToSchema)]
#[schema(as = crate::domain::ExperienceViewState)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ExperienceViewStateSchema {
    experiences: Vec<DiningExperienceSchema>,
    stats: ExperienceStats,
    loading: bool,
    #[schema(example = "Failed to refresh experiences")]
    error: Option<String>,
}

/// OpenAPI schema for [`crate::domain::ContactOutcome`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ContactOutcome)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ContactOutcomeSchema {
    stored: bool,
    email_sent: bool,
}
