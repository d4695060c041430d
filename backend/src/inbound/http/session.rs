//! Cookie-session access for handlers.
//!
//! The session cookie is the auth context: it carries the signed-in user's
//! id, email and display name when they have one. Handlers only see [`SessionContext`], never the Actix
//! session type.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{DisplayName, EmailAddress, Error, User, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const EMAIL_KEY: &str = "email";
pub(crate) const DISPLAY_NAME_KEY: &str = "display_name";

/// Wrapper exposing the session as domain operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store `user` in the cookie, replacing any previous identity.
    pub fn persist_user(&self, user: &User) -> Result<(), Error> {
        self.0.renew();
        self.0.remove(DISPLAY_NAME_KEY);
        self.0
            .insert(USER_ID_KEY, user.id().as_ref())
            .and_then(|()| self.0.insert(EMAIL_KEY, user.email().as_ref()))
            .and_then(|()| match user.display_name() {
                Some(name) => self.0.insert(DISPLAY_NAME_KEY, name.as_ref()),
                None => Ok(()),
            })
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Forget the signed-in user.
    pub fn clear(&self) {
        self.0.purge();
    }

    fn read(&self, key: &str) -> Result<Option<String>, Error> {
        self.0
            .get::<String>(key)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Signed-in user, if any. Tampered values are treated as signed out.
    pub fn user(&self) -> Result<Option<User>, Error> {
        let (Some(raw_id), Some(raw_email)) = (self.read(USER_ID_KEY)?, self.read(EMAIL_KEY)?)
        else {
            return Ok(None);
        };
        let display_name = self
            .read(DISPLAY_NAME_KEY)?
            .map(DisplayName::new)
            .transpose();
        match (UserId::new(raw_id), EmailAddress::new(raw_email), display_name) {
            (Ok(id), Ok(email), Ok(display_name)) => {
                Ok(Some(User::new(id, email).with_display_name(display_name)))
            }
            (Err(error), _, _) | (_, Err(error), _) | (_, _, Err(error)) => {
                tracing::warn!(%error, "invalid identity in session cookie");
                Ok(None)
            }
        }
    }

    /// Signed-in user or `401 Unauthorized`.
    pub fn require_user(&self) -> Result<User, Error> {
        self.user()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Signed-in user's id or `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.require_user().map(|user| user.id().clone())
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    use super::*;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};

    fn diner() -> User {
        User::new(
            UserId::new("diner-1").expect("fixture id"),
            EmailAddress::new("diner@example.com").expect("fixture email"),
        )
        .with_display_name(Some(DisplayName::new("Ada").expect("fixture name")))
    }

    #[rstest]
    #[actix_web::test]
    async fn round_trips_the_user() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_user(&diner())?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let user = session.require_user()?;
                        Ok::<_, Error>(HttpResponse::Ok().json(user))
                    }),
                ),
        )
        .await;

        let set = test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        let cookie = session_cookie(&set);
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["email"], "diner@example.com");
        assert_eq!(body["displayName"], "Ada");
    }

    #[rstest]
    #[case("/missing")]
    #[case("/tampered")]
    #[case("/blank-name")]
    #[actix_web::test]
    async fn unusable_sessions_are_unauthorised(#[case] setup: &str) {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/missing", web::get().to(|| async { HttpResponse::Ok() }))
                .route(
                    "/tampered",
                    web::get().to(|session: Session| async move {
                        session.insert(USER_ID_KEY, "has space").expect("insert id");
                        session.insert(EMAIL_KEY, "diner@example.com").expect("insert email");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/blank-name",
                    web::get().to(|session: Session| async move {
                        session.insert(USER_ID_KEY, "diner-1").expect("insert id");
                        session.insert(EMAIL_KEY, "diner@example.com").expect("insert email");
                        session.insert(DISPLAY_NAME_KEY, "  ").expect("insert name");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/require",
                    web::get().to(|session: SessionContext| async move {
                        session.require_user_id()?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;

        let set = test::call_service(&app, test::TestRequest::get().uri(setup).to_request()).await;
        let mut request = test::TestRequest::get().uri("/require");
        if let Some(cookie) = set.response().cookies().find(|c| c.name() == "session") {
            request = request.cookie(cookie.into_owned());
        }
        let res = test::call_service(&app, request.to_request()).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
