//! PostgreSQL-backed `ContactRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ContactMessage;
use crate::domain::ports::{ContactRepository, ContactRepositoryError};

use super::error_mapping;
use super::models::NewContactMessageRow;
use super::pool::{DbPool, PoolError};
use super::schema::contact_messages;

/// Append-only contact message store.
#[derive(Clone)]
pub struct DieselContactRepository {
    pool: DbPool,
}

impl DieselContactRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ContactRepositoryError {
    error_mapping::map_pool_error(error, ContactRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ContactRepositoryError {
    error_mapping::map_diesel_error(
        error,
        ContactRepositoryError::query,
        ContactRepositoryError::connection,
    )
}

fn new_row(message: &ContactMessage) -> NewContactMessageRow<'_> {
    NewContactMessageRow {
        id: Uuid::new_v4(),
        name: message.name(),
        email: message.email().as_ref(),
        message: message.message(),
        created_at: message.created_at(),
    }
}

#[async_trait]
impl ContactRepository for DieselContactRepository {
    async fn save(&self, message: &ContactMessage) -> Result<(), ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(contact_messages::table)
            .values(&new_row(message))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
