//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed entities used by the API and
//! persistence layers, and the services that implement the driving ports.
//! Types are immutable once validated and document their invariants and
//! serialisation contracts in Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - DiningExperience and friends: the experience record, its status, rating
//!   and partial updates, plus [`aggregate`] for dashboard statistics.
//! - DiningWizard: the four-step planning flow producing a [`DiningPlan`].
//! - ExperienceViewModel: live dashboard state for one user.

pub mod auth;
pub mod auth_service;
pub mod contact;
pub mod contact_service;
pub mod error;
pub mod experience;
pub mod experience_service;
pub mod experience_view;
pub mod identity_errors;
pub mod image_service;
pub mod images;
pub mod ports;
pub mod recommendation_service;
pub mod recommendations;
pub mod trace_id;
pub mod user;
pub mod wizard;

pub use self::auth::{
    CredentialsValidationError, LoginCredentials, PASSWORD_MIN_LENGTH, SignupCredentials,
};
pub use self::auth_service::IdentityAuthService;
pub use self::contact::{
    CONFIRMATION_FROM_NAME, CONFIRMATION_MESSAGE, CONTACT_FAILURE_MESSAGE, ContactConfirmation,
    ContactMessage, ContactOutcome, ContactValidationError,
};
pub use self::contact_service::ContactService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::experience::{
    DiningExperience, DiningExperienceDraft, ExperienceDetails, ExperienceDetailsDraft,
    ExperienceId, ExperiencePatch, ExperiencePatchDraft, ExperienceStats, ExperienceStatus,
    ExperienceValidationError, Rating, aggregate, by_date_descending, sort_by_date_descending,
};
pub use self::experience_service::ExperienceService;
pub use self::experience_view::{
    ExperienceViewModel, ExperienceViewState, LOAD_ERROR_MESSAGE, REFRESH_ERROR_MESSAGE,
};
pub use self::identity_errors::{AuthErrorCode, AuthFlow, auth_error_message};
pub use self::image_service::{IMAGES_PER_QUERY, ImageSearchService};
pub use self::images::{DEFAULT_IMAGE_ALT, ImageProvider, ImageResult, alt_from_tags, normalise_query};
pub use self::recommendation_service::RecommendationService;
pub use self::recommendations::{Recommendations, recommendation_prompt};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, EmailAddress, User, UserId, UserValidationError,
};
pub use self::wizard::{
    Advance, BOOKABLE_DAYS, DiningPlan, DiningWizard, GroupType, PlanDateTime, PlanSubmission,
    TimeSlot, UnknownOption, Vibe, WizardError, WizardStep, bookable_dates,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use eatopia::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
