//! Observable dashboard state for one signed-in user.
//!
//! [`ExperienceViewModel`] binds the experience query port and the change
//! feed to an [`ExperienceViewState`] published through a
//! [`tokio::sync::watch`] channel. Every user binding is a new generation;
//! results that arrive for an older generation are discarded. Within a
//! generation each fetch carries a ticket, and a field is only overwritten
//! by a result with a newer ticket than the one that last wrote it.

use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::future::BoxFuture;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::error;

use crate::domain::ports::{
    ExperienceFeed, ExperienceListener, ExperienceQuery, ExperienceSubscription,
};
use crate::domain::{DiningExperience, ExperienceStats, UserId};

/// Shown when the initial load for a user fails.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load experiences";
/// Shown when a manual refresh fails.
pub const REFRESH_ERROR_MESSAGE: &str = "Failed to refresh experiences";

/// Snapshot rendered by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceViewState {
    pub experiences: Vec<DiningExperience>,
    pub stats: ExperienceStats,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct Guard {
    generation: u64,
    next_ticket: u64,
    experiences_ticket: u64,
    stats_ticket: u64,
    in_flight: usize,
}

struct Shared {
    guard: Mutex<Guard>,
    state: watch::Sender<ExperienceViewState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Guard> {
        self.guard
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Start a new generation and publish `initial`.
    fn rebind(&self, initial: ExperienceViewState) -> u64 {
        let mut guard = self.lock();
        guard.generation += 1;
        guard.experiences_ticket = guard.next_ticket;
        guard.stats_ticket = guard.next_ticket;
        guard.in_flight = 0;
        self.state.send_replace(initial);
        guard.generation
    }

    fn invalidate(&self) {
        self.lock().generation += 1;
    }

    fn begin_fetch(&self, generation: u64) -> Option<u64> {
        let mut guard = self.lock();
        if guard.generation != generation {
            return None;
        }
        guard.next_ticket += 1;
        guard.in_flight += 1;
        self.state.send_if_modified(|state| !std::mem::replace(&mut state.loading, true));
        Some(guard.next_ticket)
    }

    fn finish_fetch(
        &self,
        generation: u64,
        ticket: u64,
        outcome: Result<(Vec<DiningExperience>, ExperienceStats), &'static str>,
    ) {
        let mut guard = self.lock();
        if guard.generation != generation {
            return;
        }
        guard.in_flight = guard.in_flight.saturating_sub(1);
        let still_loading = guard.in_flight > 0;
        let guard = &mut *guard;
        self.state.send_modify(|state| {
            match outcome {
                Ok((experiences, stats)) => {
                    if ticket > guard.experiences_ticket {
                        guard.experiences_ticket = ticket;
                        state.experiences = experiences;
                    }
                    if ticket > guard.stats_ticket {
                        guard.stats_ticket = ticket;
                        state.stats = stats;
                    }
                }
                Err(message) => state.error = Some(message.to_owned()),
            }
            state.loading = still_loading;
        });
    }

    /// Apply a pushed list, returning the ticket for the follow-up stats
    /// fetch.
    fn apply_pushed(&self, generation: u64, experiences: Vec<DiningExperience>) -> Option<u64> {
        let mut guard = self.lock();
        if guard.generation != generation {
            return None;
        }
        guard.next_ticket += 1;
        let ticket = guard.next_ticket;
        guard.experiences_ticket = ticket;
        self.state.send_modify(|state| state.experiences = experiences);
        Some(ticket)
    }

    fn apply_stats(&self, generation: u64, ticket: u64, stats: ExperienceStats) {
        let mut guard = self.lock();
        if guard.generation != generation || ticket <= guard.stats_ticket {
            return;
        }
        guard.stats_ticket = ticket;
        self.state.send_modify(|state| state.stats = stats);
    }
}

/// Live view of one user's experiences.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use eatopia::domain::ExperienceViewModel;
/// use eatopia::domain::ports::{FixtureExperienceFeed, FixtureExperienceQuery};
///
/// let view = ExperienceViewModel::new(
///     Arc::new(FixtureExperienceQuery),
///     Arc::new(FixtureExperienceFeed),
/// );
/// assert!(!view.snapshot().loading);
/// ```
pub struct ExperienceViewModel<Q: ?Sized, F: ?Sized> {
    query: Arc<Q>,
    feed: Arc<F>,
    shared: Arc<Shared>,
    user: Option<UserId>,
    generation: u64,
    subscription: Option<ExperienceSubscription>,
}

impl<Q, F> ExperienceViewModel<Q, F>
where
    Q: ExperienceQuery + ?Sized + 'static,
    F: ExperienceFeed + ?Sized,
{
    /// Create an unbound view-model with empty state.
    pub fn new(query: Arc<Q>, feed: Arc<F>) -> Self {
        let (state, _) = watch::channel(ExperienceViewState::default());
        Self {
            query,
            feed,
            shared: Arc::new(Shared {
                guard: Mutex::new(Guard::default()),
                state,
            }),
            user: None,
            generation: 0,
            subscription: None,
        }
    }

    /// Receiver observing every state change.
    pub fn watch(&self) -> watch::Receiver<ExperienceViewState> {
        self.shared.state.subscribe()
    }

    /// Current state.
    pub fn snapshot(&self) -> ExperienceViewState {
        self.shared.state.borrow().clone()
    }

    /// User the view is bound to.
    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    /// Bind the view to `user`, or clear it with `None`.
    ///
    /// Rebinding to the current user does nothing. Otherwise the previous
    /// subscription is cancelled, a new one opened, and the list and stats
    /// are loaded concurrently.
    pub async fn set_user(&mut self, user: Option<UserId>) {
        if self.user == user {
            return;
        }
        if let Some(previous) = self.subscription.take() {
            previous.unsubscribe();
        }
        self.user.clone_from(&user);

        let Some(user) = user else {
            self.generation = self.shared.rebind(ExperienceViewState::default());
            return;
        };

        self.generation = self.shared.rebind(ExperienceViewState {
            loading: true,
            ..ExperienceViewState::default()
        });
        self.subscription = Some(self.feed.subscribe(&user, self.push_listener(&user)));
        if let Some(load) = self.load(LOAD_ERROR_MESSAGE) {
            load.await;
        }
    }

    /// Reload the list and stats without touching the subscription.
    pub async fn refresh(&self) {
        if let Some(load) = self.load(REFRESH_ERROR_MESSAGE) {
            load.await;
        }
    }

    /// Reload on a background task so the caller keeps handling pushes.
    ///
    /// `loading` is raised before this returns. Returns `None` when no user
    /// is bound. Dropping the handle detaches the task; its result is still
    /// discarded if the binding changes first.
    pub fn spawn_refresh(&self) -> Option<JoinHandle<()>> {
        self.load(REFRESH_ERROR_MESSAGE).map(tokio::spawn)
    }

    /// Take a ticket for the bound user and return the fetch that settles it.
    fn load(&self, failure: &'static str) -> Option<BoxFuture<'static, ()>> {
        let user = self.user.clone()?;
        let generation = self.generation;
        let ticket = self.shared.begin_fetch(generation)?;
        let query = Arc::clone(&self.query);
        let shared = Arc::clone(&self.shared);

        Some(Box::pin(async move {
            let (experiences, stats) = tokio::join!(query.list(&user), query.stats(&user));
            let outcome = match (experiences, stats) {
                (Ok(experiences), Ok(stats)) => Ok((experiences, stats)),
                (experiences, stats) => {
                    for err in [experiences.err(), stats.err()].into_iter().flatten() {
                        error!(user_id = %user, code = ?err.code(), error = %err, "{failure}");
                    }
                    Err(failure)
                }
            };
            shared.finish_fetch(generation, ticket, outcome);
        }))
    }

    fn push_listener(&self, user: &UserId) -> ExperienceListener {
        let shared = Arc::clone(&self.shared);
        let query = Arc::clone(&self.query);
        let generation = self.generation;
        let user = user.clone();

        Arc::new(move |experiences| {
            let Some(ticket) = shared.apply_pushed(generation, experiences) else {
                return;
            };
            let Ok(runtime) = tokio::runtime::Handle::try_current() else {
                error!(user_id = %user, "no runtime to refresh stats after update");
                return;
            };
            let shared = Arc::clone(&shared);
            let query = Arc::clone(&query);
            let user = user.clone();
            runtime.spawn(async move {
                match query.stats(&user).await {
                    Ok(stats) => shared.apply_stats(generation, ticket, stats),
                    Err(err) => {
                        error!(user_id = %user, error = %err, "failed to refresh stats after update");
                    }
                }
            });
        })
    }
}

impl<Q: ?Sized, F: ?Sized> Drop for ExperienceViewModel<Q, F> {
    fn drop(&mut self) {
        self.shared.invalidate();
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

#[cfg(test)]
#[path = "experience_view_tests.rs"]
mod tests;
