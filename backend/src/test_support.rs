//! Shared doubles for unit tests.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    DiningExperience, DiningExperienceDraft, ExperienceDetails, ExperienceDetailsDraft,
    ExperienceId, ExperienceStatus, UserId,
};

/// `2025-05-01T12:00:00Z`, the instant every fixture clock starts at.
pub fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Clock that only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: Duration) {
        *self.lock_clock() += delta;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

pub fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(MutableClock::new(fixture_now()))
}

pub fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid fixture user id")
}

/// Details dated `offset_days` from [`fixture_now`].
pub fn details(name: &str, offset_days: i64, rating: Option<u8>) -> ExperienceDetails {
    ExperienceDetails::new(ExperienceDetailsDraft {
        name: name.to_owned(),
        restaurant: "Trattoria".to_owned(),
        location: "Boston".to_owned(),
        date: Some(fixture_now() + Duration::days(offset_days)),
        rating,
        ..ExperienceDetailsDraft::default()
    })
    .expect("valid fixture details")
}

/// Stored experience owned by `owner`.
pub fn experience(
    owner: &UserId,
    offset_days: i64,
    status: ExperienceStatus,
    rating: Option<u8>,
) -> DiningExperience {
    DiningExperience::new(DiningExperienceDraft {
        id: ExperienceId::random(),
        user_id: owner.clone(),
        details: details("Dinner", offset_days, rating),
        status,
        created_at: fixture_now(),
        updated_at: fixture_now(),
    })
}
