//! WebSocket inbound adapter streaming live dashboard state.
//!
//! Responsibilities:
//! - validate upgrade requests (session user, origin allow-list)
//! - spawn the per-connection session bound to that user
//! - keep WebSocket-specific concerns at the edge of the system

use actix_web::http::header::{HeaderValue, ORIGIN};
use actix_web::web::{self, Payload};
use actix_web::{HttpRequest, HttpResponse, get};
use tracing::{error, warn};
use url::Url;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;

pub mod messages;
mod session;
pub mod state;

/// Upgrade to a socket streaming the signed-in user's experiences.
#[get("/ws/experiences")]
pub async fn experiences_socket(
    state: web::Data<state::WsState>,
    session: SessionContext,
    req: HttpRequest,
    stream: Payload,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;

    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        warn!("Missing Origin header on WebSocket upgrade");
        Error::forbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        warn!("Multiple Origin headers on WebSocket upgrade");
        return Err(Error::invalid_request("Invalid Origin header"));
    }
    validate_origin(&state.origins, origin_header)?;

    let (response, ws_session, messages) = actix_ws::handle(&req, stream).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        Error::invalid_request("WebSocket upgrade failed")
    })?;
    actix_web::rt::spawn(session::handle_ws_session(
        state.query.clone(),
        state.feed.clone(),
        state.sign_outs.subscribe(),
        user_id,
        ws_session,
        messages,
    ));
    Ok(response)
}

fn validate_origin(origins: &state::AllowedOrigins, origin_header: &HeaderValue) -> ApiResult<()> {
    let origin_value = origin_header.to_str().map_err(|error| {
        warn!(error = %error, "Failed to parse Origin header as string");
        Error::invalid_request("Invalid Origin header")
    })?;

    let origin = Url::parse(origin_value).map_err(|error| {
        warn!(error = %error, "Failed to parse Origin header as URL");
        Error::invalid_request("Invalid Origin header")
    })?;

    if origins.allows(&origin) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(Error::forbidden("Origin not allowed"))
    }
}
