//! Dining experience handlers.
//!
//! ```text
//! GET    /api/v1/experiences?status=upcoming
//! POST   /api/v1/experiences
//! GET    /api/v1/experiences/stats
//! GET    /api/v1/experiences/{id}
//! PATCH  /api/v1/experiences/{id}
//! DELETE /api/v1/experiences/{id}
//! ```
//!
//! Every route is scoped to the session user; experiences owned by anyone
//! else are indistinguishable from missing ones.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{CreateExperienceRequest, CreateExperienceResponse};
use crate::domain::{
    DiningExperience, Error, ExperienceDetails, ExperienceDetailsDraft, ExperiencePatch,
    ExperiencePatchDraft, ExperienceStats, ExperienceStatus,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{DiningExperienceSchema, ErrorSchema, ExperienceStatusSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    double_option, experience_validation_error, field_error, parse_experience_id,
};

/// Body for `POST /api/v1/experiences`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceRequest {
    #[serde(default)]
    #[schema(example = "Anniversary dinner")]
    pub name: String,
    #[serde(default)]
    pub restaurant: String,
    #[serde(default)]
    pub location: String,
    pub date: Option<DateTime<Utc>>,
    #[schema(minimum = 1, maximum = 5)]
    pub rating: Option<u8>,
    pub notes: Option<String>,
    pub cuisine: Option<String>,
    pub price_range: Option<String>,
    #[schema(minimum = 1)]
    pub guests: Option<u16>,
}

impl From<ExperienceRequest> for ExperienceDetailsDraft {
    fn from(value: ExperienceRequest) -> Self {
        Self {
            name: value.name,
            restaurant: value.restaurant,
            location: value.location,
            date: value.date,
            rating: value.rating,
            notes: value.notes,
            cuisine: value.cuisine,
            price_range: value.price_range,
            guests: value.guests,
        }
    }
}

/// Body for `PATCH /api/v1/experiences/{id}`.
///
/// Absent fields are left alone; `null` clears an optional field.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePatchRequest {
    pub name: Option<String>,
    pub restaurant: Option<String>,
    pub location: Option<String>,
    pub date: Option<DateTime<Utc>>,
    #[schema(value_type = Option<ExperienceStatusSchema>)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<u8>, minimum = 1, maximum = 5)]
    pub rating: Option<Option<u8>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub cuisine: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub price_range: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<u16>)]
    pub guests: Option<Option<u16>>,
}

fn parse_status(raw: &str) -> Result<ExperienceStatus, Error> {
    raw.parse()
        .map_err(|_| field_error("status", "unknown_status", format!("unknown status: {raw}")))
}

fn parse_patch(payload: ExperiencePatchRequest) -> Result<ExperiencePatch, Error> {
    let status = payload.status.as_deref().map(parse_status).transpose()?;
    let patch = ExperiencePatch::new(ExperiencePatchDraft {
        name: payload.name,
        restaurant: payload.restaurant,
        location: payload.location,
        date: payload.date,
        status,
        rating: payload.rating,
        notes: payload.notes,
        cuisine: payload.cuisine,
        price_range: payload.price_range,
        guests: payload.guests,
    })
    .map_err(experience_validation_error)?;
    if patch.is_empty() {
        return Err(Error::invalid_request("patch must change at least one field")
            .with_details(serde_json::json!({ "code": "empty_patch" })));
    }
    Ok(patch)
}

/// Query string for `GET /api/v1/experiences`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListExperiencesQuery {
    /// Only experiences with this status.
    #[param(value_type = Option<ExperienceStatusSchema>)]
    pub status: Option<String>,
}

/// List the user's experiences, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/experiences",
    params(ListExperiencesQuery),
    responses(
        (status = 200, description = "Experiences, newest first", body = [DiningExperienceSchema]),
        (status = 400, description = "Unknown status", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["experiences"],
    operation_id = "listExperiences"
)]
#[get("/experiences")]
pub async fn list_experiences(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListExperiencesQuery>,
) -> ApiResult<web::Json<Vec<DiningExperience>>> {
    let user_id = session.require_user_id()?;
    let experiences = match query.status.as_deref() {
        Some(raw) => {
            let status = parse_status(raw)?;
            state
                .experiences_query
                .list_by_status(&user_id, status)
                .await?
        }
        None => state.experiences_query.list(&user_id).await?,
    };
    Ok(web::Json(experiences))
}

/// Record a new experience; status derives from the date.
#[utoipa::path(
    post,
    path = "/api/v1/experiences",
    request_body = ExperienceRequest,
    responses(
        (status = 201, description = "Created", body = CreateExperienceResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["experiences"],
    operation_id = "createExperience"
)]
#[post("/experiences")]
pub async fn create_experience(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ExperienceRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let details = ExperienceDetails::new(payload.into_inner().into())
        .map_err(experience_validation_error)?;
    let created = state
        .experiences
        .create(CreateExperienceRequest { user_id, details })
        .await?;
    Ok(HttpResponse::Created()
        .insert_header(("Location", format!("/api/v1/experiences/{}", created.id)))
        .json(created))
}

/// Dashboard statistics over every experience of the user.
#[utoipa::path(
    get,
    path = "/api/v1/experiences/stats",
    responses(
        (status = 200, description = "Aggregated statistics", body = ExperienceStats),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["experiences"],
    operation_id = "experienceStats"
)]
#[get("/experiences/stats")]
pub async fn experience_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ExperienceStats>> {
    let user_id = session.require_user_id()?;
    let stats = state.experiences_query.stats(&user_id).await?;
    Ok(web::Json(stats))
}

/// Fetch one experience.
#[utoipa::path(
    get,
    path = "/api/v1/experiences/{id}",
    params(("id" = String, Path, description = "Experience UUID")),
    responses(
        (status = 200, description = "Experience", body = DiningExperienceSchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["experiences"],
    operation_id = "getExperience"
)]
#[get("/experiences/{id}")]
pub async fn get_experience(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DiningExperience>> {
    let user_id = session.require_user_id()?;
    let id = parse_experience_id(&path)?;
    state
        .experiences_query
        .get(&user_id, &id)
        .await?
        .map(web::Json)
        .ok_or_else(|| Error::not_found(format!("experience {id} not found")))
}

/// Change some fields of an experience.
#[utoipa::path(
    patch,
    path = "/api/v1/experiences/{id}",
    params(("id" = String, Path, description = "Experience UUID")),
    request_body = ExperiencePatchRequest,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["experiences"],
    operation_id = "updateExperience"
)]
#[patch("/experiences/{id}")]
pub async fn update_experience(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ExperiencePatchRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = parse_experience_id(&path)?;
    let patch = parse_patch(payload.into_inner())?;
    state.experiences.update(&user_id, &id, patch).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete an experience. Deleting a missing id succeeds.
#[utoipa::path(
    delete,
    path = "/api/v1/experiences/{id}",
    params(("id" = String, Path, description = "Experience UUID")),
    responses(
        (status = 204, description = "Deleted or already absent"),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Owned by another user", body = ErrorSchema)
    ),
    tags = ["experiences"],
    operation_id = "deleteExperience"
)]
#[delete("/experiences/{id}")]
pub async fn delete_experience(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = parse_experience_id(&path)?;
    state.experiences.delete(&user_id, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "experiences_tests.rs"]
mod tests;
