//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use crate::domain::ports::{
    FixtureContactSubmission, FixtureIdentityProvider, FixtureImageSearch, FixtureTextGenerator,
    ImageSearch,
};
use crate::domain::{
    ExperienceService, IdentityAuthService, ImageSearchService, RecommendationService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::sign_outs::SignOutNotifier;
use crate::inbound::ws::state::{AllowedOrigins, WsState};
use crate::outbound::feed::BroadcastExperienceFeed;
use crate::outbound::memory::InMemoryExperienceRepository;
use crate::test_support::fixture_clock;

/// Session middleware for tests: fresh key, cookie named `session`, and no
/// `Secure` flag so plain-HTTP test requests keep the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set on `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Handler state over in-memory storage, fixture providers and the fixed
/// test clock.
pub fn memory_http_state() -> HttpState {
    memory_states().0
}

/// HTTP and WebSocket state sharing one in-memory store and change feed.
/// The socket accepts any `http://localhost:<port>` origin.
pub fn memory_states() -> (HttpState, WsState) {
    let clock = fixture_clock();
    let repository = Arc::new(InMemoryExperienceRepository::default());
    let feed = Arc::new(BroadcastExperienceFeed::new(repository.clone()));
    let experiences = Arc::new(ExperienceService::new(repository, feed.clone(), clock.clone()));
    let providers: Vec<Arc<dyn ImageSearch>> = vec![Arc::new(FixtureImageSearch)];
    let sign_outs = SignOutNotifier::default();

    let http = HttpState::new(
        HttpStatePorts {
            auth: Arc::new(IdentityAuthService::new(Arc::new(FixtureIdentityProvider))),
            experiences: experiences.clone(),
            experiences_query: experiences.clone(),
            contact: Arc::new(FixtureContactSubmission),
            images: Arc::new(ImageSearchService::new(providers)),
            recommendations: Arc::new(RecommendationService::new(Arc::new(FixtureTextGenerator))),
        },
        clock,
    )
    .with_sign_outs(sign_outs.clone());
    let ws = WsState::new(
        experiences,
        feed,
        AllowedOrigins::new(Vec::new(), true),
        sign_outs,
    );
    (http, ws)
}
