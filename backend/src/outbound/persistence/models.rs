//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{contact_messages, dining_experiences};

/// Row struct for reading from the dining_experiences table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = dining_experiences)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExperienceRow {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub restaurant: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub rating: Option<i16>,
    pub notes: Option<String>,
    pub cuisine: Option<String>,
    pub price_range: Option<String>,
    pub guests: Option<i32>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new experience records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dining_experiences)]
pub(crate) struct NewExperienceRow<'a> {
    pub id: Uuid,
    pub user_id: &'a str,
    pub name: &'a str,
    pub restaurant: &'a str,
    pub location: &'a str,
    pub date: DateTime<Utc>,
    pub rating: Option<i16>,
    pub notes: Option<&'a str>,
    pub cuisine: Option<&'a str>,
    pub price_range: Option<&'a str>,
    pub guests: Option<i32>,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for partial updates.
///
/// An outer `None` leaves the column alone; `Some(None)` writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = dining_experiences)]
pub(crate) struct ExperienceChangeset<'a> {
    pub name: Option<&'a str>,
    pub restaurant: Option<&'a str>,
    pub location: Option<&'a str>,
    pub date: Option<DateTime<Utc>>,
    pub rating: Option<Option<i16>>,
    pub notes: Option<Option<&'a str>>,
    pub cuisine: Option<Option<&'a str>>,
    pub price_range: Option<Option<&'a str>>,
    pub guests: Option<Option<i32>>,
    pub status: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for contact messages.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contact_messages)]
pub(crate) struct NewContactMessageRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub message: &'a str,
    pub created_at: DateTime<Utc>,
}
