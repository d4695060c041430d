//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only ever talk to driving
//! ports, so they can be exercised with fixtures and mocks.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AuthService, ContactSubmission, ExperienceCommand, ExperienceQuery, ImageQuery,
    RecommendationQuery,
};
use crate::inbound::sign_outs::SignOutNotifier;

/// Driving ports used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub auth: Arc<dyn AuthService>,
    pub experiences: Arc<dyn ExperienceCommand>,
    pub experiences_query: Arc<dyn ExperienceQuery>,
    pub contact: Arc<dyn ContactSubmission>,
    pub images: Arc<dyn ImageQuery>,
    pub recommendations: Arc<dyn RecommendationQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthService>,
    pub experiences: Arc<dyn ExperienceCommand>,
    pub experiences_query: Arc<dyn ExperienceQuery>,
    pub contact: Arc<dyn ContactSubmission>,
    pub images: Arc<dyn ImageQuery>,
    pub recommendations: Arc<dyn RecommendationQuery>,
    /// Source of "today" for the wizard and of contact timestamps.
    pub clock: Arc<dyn Clock>,
    /// Publishes logouts so live sockets can close.
    pub sign_outs: SignOutNotifier,
}

impl HttpState {
    /// Bundle `ports` with the clock handlers read the current time from.
    ///
    /// Logouts go to a fresh notifier; use [`HttpState::with_sign_outs`] to
    /// share one with the WebSocket adapter.
    pub fn new(ports: HttpStatePorts, clock: Arc<dyn Clock>) -> Self {
        let HttpStatePorts {
            auth,
            experiences,
            experiences_query,
            contact,
            images,
            recommendations,
        } = ports;
        Self {
            auth,
            experiences,
            experiences_query,
            contact,
            images,
            recommendations,
            clock,
            sign_outs: SignOutNotifier::default(),
        }
    }

    /// Publish logouts through `sign_outs`.
    #[must_use]
    pub fn with_sign_outs(mut self, sign_outs: SignOutNotifier) -> Self {
        self.sign_outs = sign_outs;
        self
    }
}
