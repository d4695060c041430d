//! Driving port for reading a user's experiences.

use async_trait::async_trait;

use crate::domain::{
    DiningExperience, Error, ExperienceId, ExperienceStats, ExperienceStatus, UserId,
};

/// Read side of the experience store client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExperienceQuery: Send + Sync {
    /// Every experience owned by `user_id`, newest first.
    async fn list(&self, user_id: &UserId) -> Result<Vec<DiningExperience>, Error>;

    /// One experience; `None` when absent or owned by someone else.
    async fn get(
        &self,
        user_id: &UserId,
        id: &ExperienceId,
    ) -> Result<Option<DiningExperience>, Error>;

    /// Experiences with `status`, newest first.
    async fn list_by_status(
        &self,
        user_id: &UserId,
        status: ExperienceStatus,
    ) -> Result<Vec<DiningExperience>, Error>;

    /// Aggregate statistics over [`ExperienceQuery::list`].
    async fn stats(&self, user_id: &UserId) -> Result<ExperienceStats, Error>;
}

/// Fixture query for handler tests that do not need data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureExperienceQuery;

#[async_trait]
impl ExperienceQuery for FixtureExperienceQuery {
    async fn list(&self, _user_id: &UserId) -> Result<Vec<DiningExperience>, Error> {
        Ok(Vec::new())
    }

    async fn get(
        &self,
        _user_id: &UserId,
        _id: &ExperienceId,
    ) -> Result<Option<DiningExperience>, Error> {
        Ok(None)
    }

    async fn list_by_status(
        &self,
        _user_id: &UserId,
        _status: ExperienceStatus,
    ) -> Result<Vec<DiningExperience>, Error> {
        Ok(Vec::new())
    }

    async fn stats(&self, _user_id: &UserId) -> Result<ExperienceStats, Error> {
        Ok(ExperienceStats::default())
    }
}
