//! Dining experience records and their validation rules.
//!
//! A [`DiningExperience`] is owned by exactly one user. The mutable payload
//! lives in [`ExperienceDetails`] so creation, storage and partial updates
//! share one validated shape.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

pub mod stats;

pub use stats::{ExperienceStats, aggregate};

/// Validation failures for experience payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExperienceValidationError {
    /// A required text field was blank.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    /// Ratings are whole stars between 1 and 5.
    #[error("rating must be between {min} and {max}, got {value}", min = Rating::MIN, max = Rating::MAX)]
    RatingOutOfRange { value: i64 },
    /// Guest counts start at one.
    #[error("guests must be at least 1")]
    ZeroGuests,
    /// A stored or submitted status string was not recognised.
    #[error("unknown experience status: {value}")]
    UnknownStatus { value: String },
}

/// Stable experience identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperienceId(Uuid);

impl ExperienceId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Allocate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ExperienceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ExperienceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Lifecycle of an experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceStatus {
    /// Scheduled in the future at creation time.
    Upcoming,
    /// Already happened.
    Completed,
    /// Called off by the user.
    Cancelled,
}

impl ExperienceStatus {
    /// Every status, in display order.
    pub const ALL: [Self; 3] = [Self::Upcoming, Self::Completed, Self::Cancelled];

    /// Status assigned when an experience is first recorded.
    ///
    /// A date strictly after `now` is upcoming; anything else is completed.
    /// The status is never re-evaluated as time passes.
    ///
    /// # Examples
    /// ```
    /// use chrono::{Duration, Utc};
    /// use eatopia::domain::ExperienceStatus;
    ///
    /// let now = Utc::now();
    /// assert_eq!(
    ///     ExperienceStatus::at_creation(now + Duration::days(1), now),
    ///     ExperienceStatus::Upcoming
    /// );
    /// assert_eq!(ExperienceStatus::at_creation(now, now), ExperienceStatus::Completed);
    /// ```
    pub fn at_creation(date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if date > now {
            Self::Upcoming
        } else {
            Self::Completed
        }
    }

    /// Wire and storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ExperienceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperienceStatus {
    type Err = ExperienceValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ExperienceValidationError::UnknownStatus {
                value: s.to_owned(),
            })
    }
}

/// Whole-star rating between 1 and 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating.
    pub const MAX: u8 = 5;

    /// Validate a rating value.
    pub fn new(value: u8) -> Result<Self, ExperienceValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ExperienceValidationError::RatingOutOfRange {
                value: i64::from(value),
            })
        }
    }

    /// Decode a stored rating column.
    ///
    /// Legacy rows use `0` to mean "not rated"; it decodes to `None` so it
    /// never counts towards averages.
    pub fn from_stored(value: Option<i16>) -> Result<Option<Self>, ExperienceValidationError> {
        match value {
            None | Some(0) => Ok(None),
            Some(raw) => u8::try_from(raw)
                .map_err(|_| ExperienceValidationError::RatingOutOfRange {
                    value: i64::from(raw),
                })
                .and_then(Self::new)
                .map(Some),
        }
    }

    /// Star count.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = ExperienceValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// Unvalidated experience payload as received from callers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperienceDetailsDraft {
    pub name: String,
    pub restaurant: String,
    pub location: String,
    pub date: Option<DateTime<Utc>>,
    pub rating: Option<u8>,
    pub notes: Option<String>,
    pub cuisine: Option<String>,
    pub price_range: Option<String>,
    pub guests: Option<u16>,
}

/// Validated, user-editable part of an experience.
///
/// ## Invariants
/// - `name`, `restaurant` and `location` are trimmed and non-empty.
/// - Optional text fields are trimmed; blank values become `None`.
/// - `guests`, when present, is at least one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceDetails {
    name: String,
    restaurant: String,
    location: String,
    date: DateTime<Utc>,
    rating: Option<Rating>,
    notes: Option<String>,
    cuisine: Option<String>,
    price_range: Option<String>,
    guests: Option<u16>,
}

pub(crate) fn required_text(
    value: &str,
    field: &'static str,
) -> Result<String, ExperienceValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ExperienceValidationError::EmptyField { field })
    } else {
        Ok(trimmed.to_owned())
    }
}

pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

pub(crate) fn validate_guests(guests: Option<u16>) -> Result<Option<u16>, ExperienceValidationError> {
    match guests {
        Some(0) => Err(ExperienceValidationError::ZeroGuests),
        other => Ok(other),
    }
}

impl ExperienceDetails {
    /// Validate a draft into details.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use eatopia::domain::{ExperienceDetails, ExperienceDetailsDraft};
    ///
    /// let details = ExperienceDetails::new(ExperienceDetailsDraft {
    ///     name: " Anniversary ".into(),
    ///     restaurant: "Trattoria".into(),
    ///     location: "Boston".into(),
    ///     date: Some(Utc::now()),
    ///     ..ExperienceDetailsDraft::default()
    /// })
    /// .expect("valid details");
    /// assert_eq!(details.name(), "Anniversary");
    /// ```
    pub fn new(draft: ExperienceDetailsDraft) -> Result<Self, ExperienceValidationError> {
        let ExperienceDetailsDraft {
            name,
            restaurant,
            location,
            date,
            rating,
            notes,
            cuisine,
            price_range,
            guests,
        } = draft;

        Ok(Self {
            name: required_text(&name, "name")?,
            restaurant: required_text(&restaurant, "restaurant")?,
            location: required_text(&location, "location")?,
            date: date.ok_or(ExperienceValidationError::EmptyField { field: "date" })?,
            rating: rating.map(Rating::new).transpose()?,
            notes: optional_text(notes),
            cuisine: optional_text(cuisine),
            price_range: optional_text(price_range),
            guests: validate_guests(guests)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn restaurant(&self) -> &str {
        &self.restaurant
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn cuisine(&self) -> Option<&str> {
        self.cuisine.as_deref()
    }

    pub fn price_range(&self) -> Option<&str> {
        self.price_range.as_deref()
    }

    pub fn guests(&self) -> Option<u16> {
        self.guests
    }
}

/// Partial update. `None` leaves a field untouched; for optional fields
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperiencePatch {
    name: Option<String>,
    restaurant: Option<String>,
    location: Option<String>,
    date: Option<DateTime<Utc>>,
    status: Option<ExperienceStatus>,
    rating: Option<Option<Rating>>,
    notes: Option<Option<String>>,
    cuisine: Option<Option<String>>,
    price_range: Option<Option<String>>,
    guests: Option<Option<u16>>,
}

/// Unvalidated partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperiencePatchDraft {
    pub name: Option<String>,
    pub restaurant: Option<String>,
    pub location: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub status: Option<ExperienceStatus>,
    pub rating: Option<Option<u8>>,
    pub notes: Option<Option<String>>,
    pub cuisine: Option<Option<String>>,
    pub price_range: Option<Option<String>>,
    pub guests: Option<Option<u16>>,
}

impl ExperiencePatch {
    /// Validate a partial update using the same rules as creation.
    pub fn new(draft: ExperiencePatchDraft) -> Result<Self, ExperienceValidationError> {
        let ExperiencePatchDraft {
            name,
            restaurant,
            location,
            date,
            status,
            rating,
            notes,
            cuisine,
            price_range,
            guests,
        } = draft;

        Ok(Self {
            name: name.map(|value| required_text(&value, "name")).transpose()?,
            restaurant: restaurant
                .map(|value| required_text(&value, "restaurant"))
                .transpose()?,
            location: location
                .map(|value| required_text(&value, "location"))
                .transpose()?,
            date,
            status,
            rating: rating
                .map(|value| value.map(Rating::new).transpose())
                .transpose()?,
            notes: notes.map(optional_text),
            cuisine: cuisine.map(optional_text),
            price_range: price_range.map(optional_text),
            guests: guests.map(validate_guests).transpose()?,
        })
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn restaurant(&self) -> Option<&str> {
        self.restaurant.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.date
    }

    pub fn status(&self) -> Option<ExperienceStatus> {
        self.status
    }

    pub fn rating(&self) -> Option<Option<Rating>> {
        self.rating
    }

    pub fn notes(&self) -> Option<Option<&str>> {
        self.notes.as_ref().map(Option::as_deref)
    }

    pub fn cuisine(&self) -> Option<Option<&str>> {
        self.cuisine.as_ref().map(Option::as_deref)
    }

    pub fn price_range(&self) -> Option<Option<&str>> {
        self.price_range.as_ref().map(Option::as_deref)
    }

    pub fn guests(&self) -> Option<Option<u16>> {
        self.guests
    }
}

/// Everything needed to rebuild a stored experience.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiningExperienceDraft {
    pub id: ExperienceId,
    pub user_id: UserId,
    pub details: ExperienceDetails,
    pub status: ExperienceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A recorded dining experience.
///
/// ## Invariants
/// - `user_id` never changes after creation.
/// - `updated_at` is never earlier than `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningExperience {
    id: ExperienceId,
    user_id: UserId,
    #[serde(flatten)]
    details: ExperienceDetails,
    status: ExperienceStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DiningExperience {
    /// Rebuild an experience from stored parts.
    pub fn new(draft: DiningExperienceDraft) -> Self {
        let DiningExperienceDraft {
            id,
            user_id,
            details,
            status,
            created_at,
            updated_at,
        } = draft;
        Self {
            id,
            user_id,
            details,
            status,
            created_at,
            updated_at: updated_at.max(created_at),
        }
    }

    pub fn id(&self) -> ExperienceId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn details(&self) -> &ExperienceDetails {
        &self.details
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.details.date
    }

    pub fn rating(&self) -> Option<Rating> {
        self.details.rating
    }

    pub fn status(&self) -> ExperienceStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `user_id` owns this record.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Merge a patch and bump `updated_at`.
    pub fn apply_patch(&mut self, patch: &ExperiencePatch, updated_at: DateTime<Utc>) {
        let details = &mut self.details;
        if let Some(name) = &patch.name {
            details.name.clone_from(name);
        }
        if let Some(restaurant) = &patch.restaurant {
            details.restaurant.clone_from(restaurant);
        }
        if let Some(location) = &patch.location {
            details.location.clone_from(location);
        }
        if let Some(date) = patch.date {
            details.date = date;
        }
        if let Some(rating) = patch.rating {
            details.rating = rating;
        }
        if let Some(notes) = &patch.notes {
            details.notes.clone_from(notes);
        }
        if let Some(cuisine) = &patch.cuisine {
            details.cuisine.clone_from(cuisine);
        }
        if let Some(price_range) = &patch.price_range {
            details.price_range.clone_from(price_range);
        }
        if let Some(guests) = patch.guests {
            details.guests = guests;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = updated_at.max(self.created_at);
    }
}

/// Newest-first ordering by date, ties broken by id.
pub fn by_date_descending(left: &DiningExperience, right: &DiningExperience) -> Ordering {
    right
        .date()
        .cmp(&left.date())
        .then_with(|| left.id.cmp(&right.id))
}

/// Sort experiences newest first regardless of the order a store returned.
pub fn sort_by_date_descending(experiences: &mut [DiningExperience]) {
    experiences.sort_by(by_date_descending);
}
