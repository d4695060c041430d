//! Wire-level message definitions for the experience socket.

use serde::{Deserialize, Serialize};

use crate::domain::ExperienceViewState;

/// Requests a client may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Reload the list and stats.
    Refresh,
}

/// Frames pushed to the client.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage<'a> {
    /// Full dashboard state after any change.
    Snapshot(&'a ExperienceViewState),
}
