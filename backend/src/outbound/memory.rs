//! In-process storage adapters.
//!
//! Used when no database is configured and by tests. Contents live for the
//! lifetime of the process.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{
    ContactRepository, ContactRepositoryError, ExperienceRepository, ExperienceRepositoryError,
};
use crate::domain::{
    ContactMessage, DiningExperience, ExperienceId, ExperiencePatch, ExperienceStatus, UserId,
};

/// [`ExperienceRepository`] over a map keyed by experience id.
#[derive(Debug, Default)]
pub struct InMemoryExperienceRepository {
    records: RwLock<HashMap<ExperienceId, DiningExperience>>,
}

impl InMemoryExperienceRepository {
    async fn owned_by<F>(&self, user_id: &UserId, keep: F) -> Vec<DiningExperience>
    where
        F: Fn(&DiningExperience) -> bool,
    {
        self.records
            .read()
            .await
            .values()
            .filter(|experience| experience.is_owned_by(user_id) && keep(experience))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ExperienceRepository for InMemoryExperienceRepository {
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<DiningExperience>, ExperienceRepositoryError> {
        Ok(self.owned_by(user_id, |_| true).await)
    }

    async fn list_for_user_by_status(
        &self,
        user_id: &UserId,
        status: ExperienceStatus,
    ) -> Result<Vec<DiningExperience>, ExperienceRepositoryError> {
        Ok(self
            .owned_by(user_id, |experience| experience.status() == status)
            .await)
    }

    async fn find_by_id(
        &self,
        id: &ExperienceId,
    ) -> Result<Option<DiningExperience>, ExperienceRepositoryError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn insert(&self, experience: &DiningExperience) -> Result<(), ExperienceRepositoryError> {
        self.records
            .write()
            .await
            .insert(experience.id(), experience.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: &ExperienceId,
        patch: &ExperiencePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<(), ExperienceRepositoryError> {
        let mut records = self.records.write().await;
        let experience = records
            .get_mut(id)
            .ok_or_else(|| ExperienceRepositoryError::not_found(*id))?;
        experience.apply_patch(patch, updated_at);
        Ok(())
    }

    async fn delete(&self, id: &ExperienceId) -> Result<(), ExperienceRepositoryError> {
        self.records.write().await.remove(id);
        Ok(())
    }
}

/// [`ContactRepository`] that appends to a vector.
#[derive(Debug, Default)]
pub struct InMemoryContactRepository {
    messages: RwLock<Vec<ContactMessage>>,
}

impl InMemoryContactRepository {
    /// Every stored message, oldest first.
    pub async fn messages(&self) -> Vec<ContactMessage> {
        self.messages.read().await.clone()
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn save(&self, message: &ContactMessage) -> Result<(), ContactRepositoryError> {
        self.messages.write().await.push(message.clone());
        Ok(())
    }
}
