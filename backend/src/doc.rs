//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (auth, experiences,
//!   wizard, recommendations, contact, images, health)
//! - **Schemas**: request and response bodies plus wrappers
//!   ([`ErrorSchema`], [`DiningExperienceSchema`], ...) that describe domain
//!   types without coupling them to utoipa
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::domain::ports::CreateExperienceResponse;
use crate::domain::{
    DiningPlan, ExperienceStats, GroupType, ImageProvider, ImageResult, PlanDateTime,
    PlanSubmission, Recommendations, TimeSlot, Vibe, WizardStep,
};
use crate::inbound::http::contact::{ContactRequest, ContactResponse};
use crate::inbound::http::experiences::{ExperiencePatchRequest, ExperienceRequest};
use crate::inbound::http::schemas::{
    ContactOutcomeSchema, DiningExperienceSchema, ErrorCodeSchema, ErrorSchema,
    ExperienceStatusSchema, ExperienceViewStateSchema, UserSchema,
};
use crate::inbound::http::users::{LoginRequest, PasswordResetRequest, SignupRequest};
use crate::inbound::http::wizard::{PlanRequest, WizardChoice, WizardOptions};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Eatopia API",
        description = "Dining experience journal, planning wizard and live dashboard."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::signup,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::password_reset,
        crate::inbound::http::users::current_user,
        crate::inbound::http::experiences::list_experiences,
        crate::inbound::http::experiences::create_experience,
        crate::inbound::http::experiences::experience_stats,
        crate::inbound::http::experiences::get_experience,
        crate::inbound::http::experiences::update_experience,
        crate::inbound::http::experiences::delete_experience,
        crate::inbound::http::wizard::wizard_options,
        crate::inbound::http::wizard::create_plan,
        crate::inbound::http::recommendations::recommend,
        crate::inbound::http::contact::submit_contact,
        crate::inbound::http::images::search_images,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserSchema,
        LoginRequest,
        SignupRequest,
        PasswordResetRequest,
        ExperienceStatusSchema,
        DiningExperienceSchema,
        ExperienceRequest,
        ExperiencePatchRequest,
        CreateExperienceResponse,
        ExperienceStats,
        ExperienceViewStateSchema,
        WizardStep,
        WizardChoice,
        WizardOptions,
        TimeSlot,
        GroupType,
        Vibe,
        PlanDateTime,
        PlanSubmission,
        PlanRequest,
        DiningPlan,
        Recommendations,
        ContactRequest,
        ContactResponse,
        ContactOutcomeSchema,
        ImageProvider,
        ImageResult,
    )),
    tags(
        (name = "auth", description = "Sign-in, sign-up and session management"),
        (name = "experiences", description = "Recorded dining experiences"),
        (name = "wizard", description = "Dining plan wizard"),
        (name = "recommendations", description = "Generated restaurant suggestions"),
        (name = "contact", description = "Contact form"),
        (name = "images", description = "Decorative image search"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
