//! Driving port for experience mutations.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    Error, ExperienceDetails, ExperienceId, ExperiencePatch, ExperienceStatus, UserId,
};

/// Request to record a new experience.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateExperienceRequest {
    pub user_id: UserId,
    pub details: ExperienceDetails,
}

/// Identifier and derived status of a newly created experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateExperienceResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: ExperienceId,
    #[schema(value_type = String, example = "upcoming")]
    pub status: ExperienceStatus,
}

/// Write side of the experience store client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExperienceCommand: Send + Sync {
    /// Record an experience; status derives from the current time.
    async fn create(
        &self,
        request: CreateExperienceRequest,
    ) -> Result<CreateExperienceResponse, Error>;

    /// Apply a partial update. Missing and foreign ids are not found.
    async fn update(
        &self,
        user_id: &UserId,
        id: &ExperienceId,
        patch: ExperiencePatch,
    ) -> Result<(), Error>;

    /// Remove an experience. Missing ids succeed; foreign ids are not found.
    async fn delete(&self, user_id: &UserId, id: &ExperienceId) -> Result<(), Error>;
}

/// Fixture command that accepts creations and finds nothing to change.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureExperienceCommand;

#[async_trait]
impl ExperienceCommand for FixtureExperienceCommand {
    async fn create(
        &self,
        _request: CreateExperienceRequest,
    ) -> Result<CreateExperienceResponse, Error> {
        Ok(CreateExperienceResponse {
            id: ExperienceId::random(),
            status: ExperienceStatus::Upcoming,
        })
    }

    async fn update(
        &self,
        _user_id: &UserId,
        id: &ExperienceId,
        _patch: ExperiencePatch,
    ) -> Result<(), Error> {
        Err(Error::not_found(format!("experience {id} not found")))
    }

    async fn delete(&self, _user_id: &UserId, _id: &ExperienceId) -> Result<(), Error> {
        Ok(())
    }
}
