//! Sign-out notifications shared by the HTTP and WebSocket adapters.
//!
//! `POST /logout` publishes the signed-out user; every live socket bound to
//! that user listens and closes itself.

use tokio::sync::broadcast;

use crate::domain::UserId;

const CAPACITY: usize = 64;

/// Broadcasts the id of each user who signs out.
#[derive(Debug, Clone)]
pub struct SignOutNotifier {
    sender: broadcast::Sender<UserId>,
}

impl Default for SignOutNotifier {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(CAPACITY);
        Self { sender }
    }
}

impl SignOutNotifier {
    /// Tell every listener that `user_id` signed out.
    pub fn notify(&self, user_id: &UserId) {
        // No receivers means no open sockets.
        let _ = self.sender.send(user_id.clone());
    }

    /// Listen for sign-outs published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<UserId> {
        self.sender.subscribe()
    }
}
