//! Shared WebSocket adapter state.
//!
//! Each connection builds its own view-model from these ports, so the
//! adapter can be exercised with in-memory adapters.

use std::sync::Arc;

use url::Url;

use crate::domain::ports::{ExperienceFeed, ExperienceQuery};
use crate::inbound::sign_outs::SignOutNotifier;

/// Origins allowed to open a WebSocket.
///
/// An origin matches when its scheme, host and port equal a configured
/// entry. `http://localhost` with any explicit non-zero port is accepted
/// when `allow_localhost` is set.
#[derive(Debug, Clone, Default)]
pub struct AllowedOrigins {
    origins: Vec<Url>,
    allow_localhost: bool,
}

impl AllowedOrigins {
    pub fn new(origins: Vec<Url>, allow_localhost: bool) -> Self {
        Self {
            origins,
            allow_localhost,
        }
    }

    /// Whether a parsed `Origin` header is on the list.
    pub fn allows(&self, origin: &Url) -> bool {
        let Some(host) = origin.host_str() else {
            return false;
        };
        if self.allow_localhost && origin.scheme() == "http" && host == "localhost" {
            return matches!(origin.port(), Some(port) if port != 0);
        }
        self.origins
            .iter()
            .any(|allowed| allowed.origin() == origin.origin())
    }
}

/// Dependency bundle for WebSocket handlers.
#[derive(Clone)]
pub struct WsState {
    pub query: Arc<dyn ExperienceQuery>,
    pub feed: Arc<dyn ExperienceFeed>,
    pub origins: AllowedOrigins,
    /// Logouts that close the matching sockets.
    pub sign_outs: SignOutNotifier,
}

impl WsState {
    pub fn new(
        query: Arc<dyn ExperienceQuery>,
        feed: Arc<dyn ExperienceFeed>,
        origins: AllowedOrigins,
        sign_outs: SignOutNotifier,
    ) -> Self {
        Self {
            query,
            feed,
            origins,
            sign_outs,
        }
    }
}
