//! Port for experience persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{DiningExperience, ExperienceId, ExperiencePatch, ExperienceStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by experience repository adapters.
    pub enum ExperienceRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "experience repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "experience repository query failed: {message}",
        /// The targeted record does not exist.
        NotFound { id: ExperienceId } =>
            "experience {id} does not exist",
    }
}

/// Storage for dining experiences. Every read is scoped by owner except
/// lookups by id, whose ownership the caller verifies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExperienceRepository: Send + Sync {
    /// All experiences owned by `user_id`, in no particular order.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<DiningExperience>, ExperienceRepositoryError>;

    /// Experiences owned by `user_id` with the given status.
    async fn list_for_user_by_status(
        &self,
        user_id: &UserId,
        status: ExperienceStatus,
    ) -> Result<Vec<DiningExperience>, ExperienceRepositoryError>;

    /// Find one experience by id.
    async fn find_by_id(
        &self,
        id: &ExperienceId,
    ) -> Result<Option<DiningExperience>, ExperienceRepositoryError>;

    /// Persist a new experience.
    async fn insert(&self, experience: &DiningExperience) -> Result<(), ExperienceRepositoryError>;

    /// Merge `patch` into an existing record and stamp `updated_at`.
    ///
    /// Fails with [`ExperienceRepositoryError::NotFound`] when `id` is absent.
    async fn update(
        &self,
        id: &ExperienceId,
        patch: &ExperiencePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<(), ExperienceRepositoryError>;

    /// Remove a record. Removing a missing id succeeds.
    async fn delete(&self, id: &ExperienceId) -> Result<(), ExperienceRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureExperienceRepository;

#[async_trait]
impl ExperienceRepository for FixtureExperienceRepository {
    async fn list_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<DiningExperience>, ExperienceRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_for_user_by_status(
        &self,
        _user_id: &UserId,
        _status: ExperienceStatus,
    ) -> Result<Vec<DiningExperience>, ExperienceRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(
        &self,
        _id: &ExperienceId,
    ) -> Result<Option<DiningExperience>, ExperienceRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _experience: &DiningExperience) -> Result<(), ExperienceRepositoryError> {
        Ok(())
    }

    async fn update(
        &self,
        id: &ExperienceId,
        _patch: &ExperiencePatch,
        _updated_at: DateTime<Utc>,
    ) -> Result<(), ExperienceRepositoryError> {
        Err(ExperienceRepositoryError::not_found(*id))
    }

    async fn delete(&self, _id: &ExperienceId) -> Result<(), ExperienceRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_update_reports_missing_record() {
        let id = ExperienceId::random();
        let err = FixtureExperienceRepository
            .update(&id, &ExperiencePatch::default(), Utc::now())
            .await
            .expect_err("fixture has no records");
        assert_eq!(err, ExperienceRepositoryError::not_found(id));
        assert_eq!(err.to_string(), format!("experience {id} does not exist"));
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_delete_of_missing_record_succeeds() {
        FixtureExperienceRepository
            .delete(&ExperienceId::random())
            .await
            .expect("delete is unconditional");
    }
}
