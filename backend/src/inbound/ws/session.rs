//! Per-connection WebSocket handler.
//!
//! Each connection owns an [`ExperienceViewModel`] bound to the session user
//! for the lifetime of the socket. Every state change is pushed as a
//! snapshot frame; `{"type":"refresh"}` reloads in the background so pushes
//! and heartbeats keep flowing. Signing out over HTTP clears the view and
//! closes the socket. The server pings every 5s and closes a connection
//! after 10s without client traffic. Tests shorten both intervals.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info, warn};

use crate::domain::ports::{ExperienceFeed, ExperienceQuery};
use crate::domain::{ExperienceViewModel, ExperienceViewState, UserId};
use crate::inbound::ws::messages::{ClientMessage, ServerMessage};

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
pub(super) const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
pub(super) const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
pub(super) const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
pub(super) const CLIENT_TIMEOUT: Duration = Duration::from_millis(300);

type ViewModel = ExperienceViewModel<dyn ExperienceQuery, dyn ExperienceFeed>;

pub(super) async fn handle_ws_session(
    query: Arc<dyn ExperienceQuery>,
    feed: Arc<dyn ExperienceFeed>,
    sign_outs: broadcast::Receiver<UserId>,
    user_id: UserId,
    session: Session,
    stream: MessageStream,
) {
    let view = ViewModel::new(query, feed);
    let updates = view.watch();
    WsSession {
        view,
        updates,
        user_id,
        sign_outs,
        sign_outs_open: true,
    }
    .run(session, stream)
    .await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    InvalidPayload,
    SignedOut,
    Network(Closed),
}

enum Incoming {
    Tick,
    StateChanged,
    SignOut(Result<UserId, RecvError>),
    Frame(Option<Result<Message, ProtocolError>>),
}

struct WsSession {
    view: ViewModel,
    updates: watch::Receiver<ExperienceViewState>,
    user_id: UserId,
    sign_outs: broadcast::Receiver<UserId>,
    sign_outs_open: bool,
}

impl WsSession {
    async fn run(mut self, mut session: Session, mut stream: MessageStream) {
        self.view.set_user(Some(self.user_id.clone())).await;
        if let Err(error) = self.push_snapshot(&mut session).await {
            self.shutdown(session, SessionError::Network(error)).await;
            return;
        }

        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let incoming = tokio::select! {
                _ = heartbeat.tick() => Incoming::Tick,
                changed = self.updates.changed() => match changed {
                    Ok(()) => Incoming::StateChanged,
                    Err(_) => Incoming::Frame(None),
                },
                notice = self.sign_outs.recv(), if self.sign_outs_open => Incoming::SignOut(notice),
                message = stream.recv() => Incoming::Frame(message),
            };

            let result = match incoming {
                Incoming::Tick => Self::handle_heartbeat_tick(&mut session, last_heartbeat).await,
                Incoming::StateChanged => self
                    .push_snapshot(&mut session)
                    .await
                    .map_err(SessionError::Network),
                Incoming::SignOut(notice) => self.handle_sign_out(notice).await,
                Incoming::Frame(message) => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message)
                        .await
                }
            };

            if let Err(error) = result {
                self.shutdown(session, error).await;
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(
        session: &mut Session,
        last_heartbeat: Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }
        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };
        let message = message.map_err(SessionError::Protocol)?;
        *last_heartbeat = Instant::now();

        match message {
            Message::Ping(payload) => session.pong(&payload).await.map_err(SessionError::Network),
            Message::Text(text) => self.handle_text_message(text.as_ref()),
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    async fn handle_sign_out(
        &mut self,
        notice: Result<UserId, RecvError>,
    ) -> Result<(), SessionError> {
        match notice {
            Ok(user_id) if user_id != self.user_id => return Ok(()),
            Ok(_) => {}
            // A lagging listener may have skipped its own user.
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Sign-out notifications lagged");
            }
            Err(RecvError::Closed) => {
                self.sign_outs_open = false;
                return Ok(());
            }
        }
        self.view.set_user(None).await;
        Err(SessionError::SignedOut)
    }

    fn handle_text_message(&self, text: &str) -> Result<(), SessionError> {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(ClientMessage::Refresh) => {
                self.view.spawn_refresh();
                Ok(())
            }
            Err(error) => {
                warn!(error = %error, "Rejected malformed WebSocket payload");
                Err(SessionError::InvalidPayload)
            }
        }
    }

    async fn push_snapshot(&mut self, session: &mut Session) -> Result<(), Closed> {
        let body = {
            let state = self.updates.borrow_and_update();
            serde_json::to_string(&ServerMessage::Snapshot(&state))
        };
        match body {
            Ok(body) => session.text(body).await,
            Err(error) => {
                warn!(error = %error, "Failed to serialise experience snapshot");
                Ok(())
            }
        }
    }

    async fn shutdown(self, session: Session, error: SessionError) {
        log_shutdown_reason(&error);
        if let Some(reason) = close_reason_for(error) {
            if let Err(error) = session.close(reason).await {
                debug!(error = %error, "WebSocket already closed");
            }
        }
    }
}

fn log_shutdown_reason(error: &SessionError) {
    match error {
        SessionError::HeartbeatTimeout => {
            warn!("WebSocket heartbeat timeout; closing connection");
        }
        SessionError::Protocol(error) => {
            warn!(error = %error, "WebSocket protocol error");
        }
        SessionError::Network(error) => {
            warn!(error = %error, "WebSocket send failed; closing connection");
        }
        SessionError::SignedOut => {
            info!("User signed out; closing WebSocket");
        }
        SessionError::InvalidPayload
        | SessionError::ClientClosed(_)
        | SessionError::StreamClosed => {}
    }
}

/// `None` when the socket is already gone and no close frame can be sent.
fn close_reason_for(error: SessionError) -> Option<Option<CloseReason>> {
    let reason = |code, description: &str| {
        Some(CloseReason {
            code,
            description: Some(description.to_owned()),
        })
    };
    match error {
        SessionError::HeartbeatTimeout => Some(reason(CloseCode::Normal, "heartbeat timeout")),
        SessionError::Protocol(_) => Some(reason(CloseCode::Protocol, "protocol error")),
        SessionError::InvalidPayload => Some(reason(CloseCode::Policy, "invalid payload")),
        SessionError::SignedOut => Some(reason(CloseCode::Normal, "signed out")),
        SessionError::ClientClosed(reason) => Some(reason),
        SessionError::StreamClosed | SessionError::Network(_) => None,
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
