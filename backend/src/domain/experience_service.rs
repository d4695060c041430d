//! Experience store client services.
//!
//! [`ExperienceService`] implements both experience driving ports over a
//! repository and a change feed. Listings are always re-sorted newest first
//! here, whatever order the adapter returned.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    CreateExperienceRequest, CreateExperienceResponse, ExperienceCommand, ExperienceFeed,
    ExperienceQuery, ExperienceRepository, ExperienceRepositoryError,
};
use crate::domain::{
    DiningExperience, DiningExperienceDraft, Error, ExperienceId, ExperiencePatch,
    ExperienceStats, ExperienceStatus, UserId, aggregate, sort_by_date_descending,
};

fn map_repository_error(error: ExperienceRepositoryError) -> Error {
    match error {
        ExperienceRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("experience repository unavailable: {message}"))
        }
        ExperienceRepositoryError::Query { message } => {
            Error::internal(format!("experience repository error: {message}"))
        }
        ExperienceRepositoryError::NotFound { id } => not_found(&id),
    }
}

fn not_found(id: &ExperienceId) -> Error {
    Error::not_found(format!("experience {id} not found"))
}

/// Experience service implementing [`ExperienceQuery`] and
/// [`ExperienceCommand`].
pub struct ExperienceService<R: ?Sized, F: ?Sized> {
    repository: Arc<R>,
    feed: Arc<F>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized, F: ?Sized> Clone for ExperienceService<R, F> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            feed: Arc::clone(&self.feed),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R: ?Sized, F: ?Sized> ExperienceService<R, F> {
    /// Create a service over `repository`, announcing writes on `feed`.
    pub fn new(repository: Arc<R>, feed: Arc<F>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            feed,
            clock,
        }
    }
}

impl<R, F> ExperienceService<R, F>
where
    R: ExperienceRepository + ?Sized,
    F: ExperienceFeed + ?Sized,
{
    /// Fetch `id` and confirm `user_id` owns it.
    async fn owned(
        &self,
        user_id: &UserId,
        id: &ExperienceId,
    ) -> Result<Option<DiningExperience>, Error> {
        let found = self
            .repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?;
        Ok(found.filter(|experience| experience.is_owned_by(user_id)))
    }
}

#[async_trait]
impl<R, F> ExperienceQuery for ExperienceService<R, F>
where
    R: ExperienceRepository + ?Sized,
    F: ExperienceFeed + ?Sized,
{
    async fn list(&self, user_id: &UserId) -> Result<Vec<DiningExperience>, Error> {
        let mut experiences = self
            .repository
            .list_for_user(user_id)
            .await
            .map_err(map_repository_error)?;
        sort_by_date_descending(&mut experiences);
        Ok(experiences)
    }

    async fn get(
        &self,
        user_id: &UserId,
        id: &ExperienceId,
    ) -> Result<Option<DiningExperience>, Error> {
        self.owned(user_id, id).await
    }

    async fn list_by_status(
        &self,
        user_id: &UserId,
        status: ExperienceStatus,
    ) -> Result<Vec<DiningExperience>, Error> {
        let mut experiences = self
            .repository
            .list_for_user_by_status(user_id, status)
            .await
            .map_err(map_repository_error)?;
        sort_by_date_descending(&mut experiences);
        Ok(experiences)
    }

    async fn stats(&self, user_id: &UserId) -> Result<ExperienceStats, Error> {
        let experiences = self.list(user_id).await?;
        Ok(aggregate(&experiences))
    }
}

#[async_trait]
impl<R, F> ExperienceCommand for ExperienceService<R, F>
where
    R: ExperienceRepository + ?Sized,
    F: ExperienceFeed + ?Sized,
{
    async fn create(
        &self,
        request: CreateExperienceRequest,
    ) -> Result<CreateExperienceResponse, Error> {
        let CreateExperienceRequest { user_id, details } = request;
        let now = self.clock.utc();
        let status = ExperienceStatus::at_creation(details.date(), now);
        let experience = DiningExperience::new(DiningExperienceDraft {
            id: ExperienceId::random(),
            user_id,
            details,
            status,
            created_at: now,
            updated_at: now,
        });

        self.repository
            .insert(&experience)
            .await
            .map_err(map_repository_error)?;
        self.feed.notify(experience.user_id());
        tracing::debug!(
            experience_id = %experience.id(),
            user_id = %experience.user_id(),
            %status,
            "experience created"
        );

        Ok(CreateExperienceResponse {
            id: experience.id(),
            status,
        })
    }

    async fn update(
        &self,
        user_id: &UserId,
        id: &ExperienceId,
        patch: ExperiencePatch,
    ) -> Result<(), Error> {
        if self.owned(user_id, id).await?.is_none() {
            return Err(not_found(id));
        }

        self.repository
            .update(id, &patch, self.clock.utc())
            .await
            .map_err(map_repository_error)?;
        self.feed.notify(user_id);
        Ok(())
    }

    async fn delete(&self, user_id: &UserId, id: &ExperienceId) -> Result<(), Error> {
        let found = self
            .repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?;
        match found {
            None => Ok(()),
            Some(experience) if !experience.is_owned_by(user_id) => Err(not_found(id)),
            Some(_) => {
                self.repository
                    .delete(id)
                    .await
                    .map_err(map_repository_error)?;
                self.feed.notify(user_id);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "experience_service_tests.rs"]
mod tests;
