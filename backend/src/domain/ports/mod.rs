//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_service;
mod confirmation_mailer;
mod contact_repository;
mod contact_submission;
mod experience_command;
mod experience_feed;
mod experience_query;
mod experience_repository;
mod identity_provider;
mod image_search;
mod text_generator;

#[cfg(test)]
pub use auth_service::MockAuthService;
pub use auth_service::AuthService;
#[cfg(test)]
pub use confirmation_mailer::MockConfirmationMailer;
pub use confirmation_mailer::{
    ConfirmationMailer, ConfirmationMailerError, FixtureConfirmationMailer,
};
#[cfg(test)]
pub use contact_repository::MockContactRepository;
pub use contact_repository::{ContactRepository, ContactRepositoryError, FixtureContactRepository};
#[cfg(test)]
pub use contact_submission::MockContactSubmission;
pub use contact_submission::{ContactSubmission, FixtureContactSubmission};
#[cfg(test)]
pub use experience_command::MockExperienceCommand;
pub use experience_command::{
    CreateExperienceRequest, CreateExperienceResponse, ExperienceCommand,
    FixtureExperienceCommand,
};
#[cfg(test)]
pub use experience_feed::MockExperienceFeed;
pub use experience_feed::{
    ExperienceFeed, ExperienceListener, ExperienceSubscription, FixtureExperienceFeed,
};
#[cfg(test)]
pub use experience_query::MockExperienceQuery;
pub use experience_query::{ExperienceQuery, FixtureExperienceQuery};
#[cfg(test)]
pub use experience_repository::MockExperienceRepository;
pub use experience_repository::{
    ExperienceRepository, ExperienceRepositoryError, FixtureExperienceRepository,
};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{FixtureIdentityProvider, IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use image_search::{MockImageQuery, MockImageSearch};
pub use image_search::{FixtureImageSearch, ImageQuery, ImageSearch, ImageSearchError};
#[cfg(test)]
pub use text_generator::{MockRecommendationQuery, MockTextGenerator};
pub use text_generator::{
    FixtureTextGenerator, RecommendationQuery, TextGenerator, TextGeneratorError,
};
