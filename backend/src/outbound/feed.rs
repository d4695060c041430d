//! Process-local experience change feed.
//!
//! Writers announce the owner of each changed record on a
//! `tokio::sync::broadcast` channel. Every subscription owns a task that
//! waits for its user's announcements, re-reads the full list from the
//! repository and hands it, newest first, to the listener. Cancelling the
//! subscription aborts the task.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, warn};

use crate::domain::ports::{
    ExperienceFeed, ExperienceListener, ExperienceRepository, ExperienceSubscription,
};
use crate::domain::{UserId, sort_by_date_descending};

const CHANNEL_CAPACITY: usize = 256;

/// [`ExperienceFeed`] backed by a broadcast channel of changed owners.
pub struct BroadcastExperienceFeed {
    repository: Arc<dyn ExperienceRepository>,
    changes: broadcast::Sender<UserId>,
}

impl BroadcastExperienceFeed {
    /// Feed re-reading lists from `repository`.
    pub fn new(repository: Arc<dyn ExperienceRepository>) -> Self {
        let (changes, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            repository,
            changes,
        }
    }
}

async fn deliver(
    repository: &dyn ExperienceRepository,
    user_id: &UserId,
    listener: &ExperienceListener,
) {
    match repository.list_for_user(user_id).await {
        Ok(mut experiences) => {
            sort_by_date_descending(&mut experiences);
            listener(experiences);
        }
        Err(err) => error!(%user_id, error = %err, "failed to reload experiences for subscriber"),
    }
}

impl ExperienceFeed for BroadcastExperienceFeed {
    fn subscribe(&self, user_id: &UserId, listener: ExperienceListener) -> ExperienceSubscription {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            error!(%user_id, "experience feed needs a Tokio runtime; subscription inactive");
            return ExperienceSubscription::noop();
        };
        let mut changes = self.changes.subscribe();
        let repository = Arc::clone(&self.repository);
        let user_id = user_id.clone();

        let task = runtime.spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(changed) if changed == user_id => {
                        deliver(repository.as_ref(), &user_id, &listener).await;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(%user_id, skipped, "experience feed lagged; reloading");
                        deliver(repository.as_ref(), &user_id, &listener).await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        ExperienceSubscription::new(move || task.abort())
    }

    fn notify(&self, user_id: &UserId) {
        if self.changes.send(user_id.clone()).is_err() {
            debug!(%user_id, "experience changed with no subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Mutex;
    use std::time::Duration;

    use rstest::rstest;
    use tokio::sync::mpsc;

    use super::*;
    use crate::domain::{DiningExperience, ExperienceStatus};
    use crate::outbound::memory::InMemoryExperienceRepository;
    use crate::test_support::{experience, user};

    fn channel_listener() -> (ExperienceListener, mpsc::UnboundedReceiver<Vec<DiningExperience>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx = Mutex::new(tx);
        let listener: ExperienceListener = Arc::new(move |list| {
            if let Ok(tx) = tx.lock() {
                let _ = tx.send(list);
            }
        });
        (listener, rx)
    }

    async fn next(rx: &mut mpsc::UnboundedReceiver<Vec<DiningExperience>>) -> Vec<DiningExperience> {
        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("update within a second")
            .expect("channel open")
    }

    async fn nothing(rx: &mut mpsc::UnboundedReceiver<Vec<DiningExperience>>) {
        let outcome = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(!matches!(outcome, Ok(Some(_))), "unexpected update");
    }

    #[rstest]
    #[tokio::test]
    async fn every_subscriber_of_the_user_gets_each_update() {
        let repository = Arc::new(InMemoryExperienceRepository::default());
        let feed = BroadcastExperienceFeed::new(repository.clone());
        let ada = user("ada");
        let (first, mut first_rx) = channel_listener();
        let (second, mut second_rx) = channel_listener();
        let _first = feed.subscribe(&ada, first);
        let second_subscription = feed.subscribe(&ada, second);

        let older = experience(&ada, -2, ExperienceStatus::Completed, None);
        let newer = experience(&ada, 2, ExperienceStatus::Upcoming, None);
        repository.insert(&older).await.expect("insert");
        repository.insert(&newer).await.expect("insert");
        feed.notify(&ada);

        let expected = vec![newer.clone(), older.clone()];
        assert_eq!(next(&mut first_rx).await, expected);
        assert_eq!(next(&mut second_rx).await, expected);

        second_subscription.unsubscribe();
        repository.delete(&older.id()).await.expect("delete");
        feed.notify(&ada);

        assert_eq!(next(&mut first_rx).await, vec![newer]);
        nothing(&mut second_rx).await;
    }

    #[rstest]
    #[tokio::test]
    async fn other_users_changes_are_not_delivered() {
        let repository = Arc::new(InMemoryExperienceRepository::default());
        let feed = BroadcastExperienceFeed::new(repository.clone());
        let (listener, mut rx) = channel_listener();
        let _subscription = feed.subscribe(&user("ada"), listener);

        feed.notify(&user("bob"));

        nothing(&mut rx).await;
    }

    #[rstest]
    #[tokio::test]
    async fn dropping_the_subscription_stops_delivery() {
        let repository = Arc::new(InMemoryExperienceRepository::default());
        let feed = BroadcastExperienceFeed::new(repository.clone());
        let (listener, mut rx) = channel_listener();
        drop(feed.subscribe(&user("ada"), listener));

        feed.notify(&user("ada"));

        nothing(&mut rx).await;
    }

    #[rstest]
    fn subscribing_outside_a_runtime_is_inert() {
        let feed = BroadcastExperienceFeed::new(Arc::new(InMemoryExperienceRepository::default()));
        let (listener, _rx) = channel_listener();

        feed.subscribe(&user("ada"), listener).unsubscribe();
    }
}
