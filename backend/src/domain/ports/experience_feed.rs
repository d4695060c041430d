//! Port for live experience list updates.
//!
//! A subscription receives the owner's complete, newest-first list after
//! every write. Updates are not diffs and consecutive writes are not
//! coalesced.

use std::fmt;
use std::sync::Arc;

use crate::domain::{DiningExperience, UserId};

/// Callback receiving the refreshed list.
pub type ExperienceListener = Arc<dyn Fn(Vec<DiningExperience>) + Send + Sync>;

/// Handle keeping a subscription alive.
///
/// Delivery stops when the handle is unsubscribed or dropped, whichever
/// happens first. Cancellation runs at most once.
#[must_use = "dropping the subscription stops delivery immediately"]
pub struct ExperienceSubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ExperienceSubscription {
    /// Wrap the adapter's cancellation routine.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Subscription with nothing to cancel.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Stop delivery permanently.
    pub fn unsubscribe(mut self) {
        self.cancel_once();
    }

    fn cancel_once(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ExperienceSubscription {
    fn drop(&mut self) {
        self.cancel_once();
    }
}

impl fmt::Debug for ExperienceSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExperienceSubscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Change feed for a user's experiences.
#[cfg_attr(test, mockall::automock)]
pub trait ExperienceFeed: Send + Sync {
    /// Deliver the owner's full list to `listener` after every change.
    fn subscribe(&self, user_id: &UserId, listener: ExperienceListener) -> ExperienceSubscription;

    /// Announce that `user_id`'s experiences changed.
    fn notify(&self, user_id: &UserId);
}

/// Feed that never delivers anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureExperienceFeed;

impl ExperienceFeed for FixtureExperienceFeed {
    fn subscribe(&self, _user_id: &UserId, _listener: ExperienceListener) -> ExperienceSubscription {
        ExperienceSubscription::noop()
    }

    fn notify(&self, _user_id: &UserId) {}
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use rstest::rstest;

    fn counting_subscription() -> (ExperienceSubscription, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let observed = Arc::clone(&calls);
        let subscription = ExperienceSubscription::new(move || {
            observed.fetch_add(1, Ordering::SeqCst);
        });
        (subscription, calls)
    }

    #[rstest]
    fn unsubscribe_cancels_once() {
        let (subscription, calls) = counting_subscription();
        subscription.unsubscribe();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn drop_cancels() {
        let (subscription, calls) = counting_subscription();
        drop(subscription);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
