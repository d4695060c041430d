//! PostgreSQL-backed `ExperienceRepository` implementation using Diesel ORM.
//!
//! Rows are rebuilt through the validating domain constructors, so a row that
//! no longer satisfies the domain rules surfaces as a query error instead of
//! leaking into responses.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ExperienceRepository, ExperienceRepositoryError};
use crate::domain::{
    DiningExperience, DiningExperienceDraft, ExperienceDetails, ExperienceDetailsDraft,
    ExperienceId, ExperiencePatch, ExperienceStatus, Rating, UserId,
};

use super::error_mapping;
use super::models::{ExperienceChangeset, ExperienceRow, NewExperienceRow};
use super::pool::{DbPool, PoolError};
use super::schema::dining_experiences;

/// Diesel-backed implementation of the experience repository port.
#[derive(Clone)]
pub struct DieselExperienceRepository {
    pool: DbPool,
}

impl DieselExperienceRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load(
        &self,
        user_id: &UserId,
        status: Option<ExperienceStatus>,
    ) -> Result<Vec<DiningExperience>, ExperienceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = dining_experiences::table
            .filter(dining_experiences::user_id.eq(user_id.as_ref()))
            .select(ExperienceRow::as_select())
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(dining_experiences::status.eq(status.as_str()));
        }
        let rows: Vec<ExperienceRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_experience).collect()
    }
}

fn map_pool_error(error: PoolError) -> ExperienceRepositoryError {
    error_mapping::map_pool_error(error, ExperienceRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ExperienceRepositoryError {
    error_mapping::map_diesel_error(
        error,
        ExperienceRepositoryError::query,
        ExperienceRepositoryError::connection,
    )
}

fn corrupt(field: &str, err: impl std::fmt::Display) -> ExperienceRepositoryError {
    ExperienceRepositoryError::query(format!("stored {field} is invalid: {err}"))
}

/// Convert a database row into a validated domain experience.
fn row_to_experience(row: ExperienceRow) -> Result<DiningExperience, ExperienceRepositoryError> {
    let ExperienceRow {
        id,
        user_id,
        name,
        restaurant,
        location,
        date,
        rating,
        notes,
        cuisine,
        price_range,
        guests,
        status,
        created_at,
        updated_at,
    } = row;

    let rating = Rating::from_stored(rating).map_err(|err| corrupt("rating", err))?;
    let guests = guests
        .map(u16::try_from)
        .transpose()
        .map_err(|err| corrupt("guests", err))?;
    let details = ExperienceDetails::new(ExperienceDetailsDraft {
        name,
        restaurant,
        location,
        date: Some(date),
        rating: rating.map(Rating::get),
        notes,
        cuisine,
        price_range,
        guests,
    })
    .map_err(|err| corrupt("details", err))?;

    Ok(DiningExperience::new(DiningExperienceDraft {
        id: ExperienceId::from_uuid(id),
        user_id: UserId::new(user_id).map_err(|err| corrupt("user_id", err))?,
        details,
        status: status.parse().map_err(|err| corrupt("status", err))?,
        created_at,
        updated_at,
    }))
}

fn new_row(experience: &DiningExperience) -> NewExperienceRow<'_> {
    let details = experience.details();
    NewExperienceRow {
        id: *experience.id().as_uuid(),
        user_id: experience.user_id().as_ref(),
        name: details.name(),
        restaurant: details.restaurant(),
        location: details.location(),
        date: details.date(),
        rating: details.rating().map(|rating| i16::from(rating.get())),
        notes: details.notes(),
        cuisine: details.cuisine(),
        price_range: details.price_range(),
        guests: details.guests().map(i32::from),
        status: experience.status().as_str(),
        created_at: experience.created_at(),
        updated_at: experience.updated_at(),
    }
}

fn changeset(patch: &ExperiencePatch, updated_at: DateTime<Utc>) -> ExperienceChangeset<'_> {
    ExperienceChangeset {
        name: patch.name(),
        restaurant: patch.restaurant(),
        location: patch.location(),
        date: patch.date(),
        rating: patch
            .rating()
            .map(|rating| rating.map(|value| i16::from(value.get()))),
        notes: patch.notes(),
        cuisine: patch.cuisine(),
        price_range: patch.price_range(),
        guests: patch.guests().map(|guests| guests.map(i32::from)),
        status: patch.status().map(ExperienceStatus::as_str),
        updated_at,
    }
}

#[async_trait]
impl ExperienceRepository for DieselExperienceRepository {
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<DiningExperience>, ExperienceRepositoryError> {
        self.load(user_id, None).await
    }

    async fn list_for_user_by_status(
        &self,
        user_id: &UserId,
        status: ExperienceStatus,
    ) -> Result<Vec<DiningExperience>, ExperienceRepositoryError> {
        self.load(user_id, Some(status)).await
    }

    async fn find_by_id(
        &self,
        id: &ExperienceId,
    ) -> Result<Option<DiningExperience>, ExperienceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = dining_experiences::table
            .filter(dining_experiences::id.eq(id.as_uuid()))
            .select(ExperienceRow::as_select())
            .first::<ExperienceRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_experience).transpose()
    }

    async fn insert(&self, experience: &DiningExperience) -> Result<(), ExperienceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(dining_experiences::table)
            .values(&new_row(experience))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(
        &self,
        id: &ExperienceId,
        patch: &ExperiencePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<(), ExperienceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(dining_experiences::table.find(id.as_uuid()))
            .set(&changeset(patch, updated_at))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if affected == 0 {
            return Err(ExperienceRepositoryError::not_found(*id));
        }
        Ok(())
    }

    async fn delete(&self, id: &ExperienceId) -> Result<(), ExperienceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(dining_experiences::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
