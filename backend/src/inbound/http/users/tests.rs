//! Tests for account and session handlers.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::FixtureIdentityProvider;
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::test_utils::{memory_http_state, session_cookie, test_session_middleware};

fn test_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(memory_http_state()))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(login)
                .service(signup)
                .service(logout)
                .service(password_reset)
                .service(current_user),
        )
}

fn post(uri: &str, body: Value) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri(uri)
        .set_json(body)
        .to_request()
}

async fn error_body(response: actix_web::dev::ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("error payload")
}

#[rstest]
#[actix_web::test]
async fn login_sets_a_session_for_me() {
    let app = actix_test::init_service(test_app()).await;

    let res = actix_test::call_service(
        &app,
        post(
            "/api/v1/login",
            json!({
                "email": FixtureIdentityProvider::EMAIL,
                "password": FixtureIdentityProvider::PASSWORD
            }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res);

    let me = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(me.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(me).await;
    assert_eq!(body["id"], FixtureIdentityProvider::USER_ID);
    assert_eq!(body["email"], FixtureIdentityProvider::EMAIL);
    assert_eq!(body["displayName"], FixtureIdentityProvider::DISPLAY_NAME);
}

#[rstest]
#[case("nobody@example.com", "password", "No account found with this email address.", "auth/user-not-found")]
#[case("diner@example.com", "wrong!", "Incorrect password.", "auth/wrong-password")]
#[actix_web::test]
async fn login_rejections_use_provider_messages(
    #[case] email: &str,
    #[case] password: &str,
    #[case] message: &str,
    #[case] code: &str,
) {
    let app = actix_test::init_service(test_app()).await;

    let res = actix_test::call_service(
        &app,
        post("/api/v1/login", json!({ "email": email, "password": password })),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = error_body(res).await;
    assert_eq!(body["message"], message);
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[case(json!({ "email": "not-an-email", "password": "secret1", "confirmPassword": "secret1", "displayName": "Ada" }), "email", "Invalid email address.")]
#[case(json!({ "email": "new@example.com", "password": "secret1", "confirmPassword": "secret2", "displayName": "Ada" }), "confirmPassword", "Passwords do not match")]
#[case(json!({ "email": "new@example.com", "password": "five5", "confirmPassword": "five5", "displayName": "Ada" }), "password", "Password must be at least 6 characters long")]
#[case(json!({ "email": "new@example.com", "password": "secret1", "confirmPassword": "secret1", "displayName": "  " }), "displayName", "Please enter your name.")]
#[actix_web::test]
async fn signup_validates_the_form_before_calling_the_provider(
    #[case] body: Value,
    #[case] field: &str,
    #[case] message: &str,
) {
    let app = actix_test::init_service(test_app()).await;

    let res = actix_test::call_service(&app, post("/api/v1/signup", body)).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = error_body(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["message"], message);
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn signup_of_an_existing_account_conflicts() {
    let app = actix_test::init_service(test_app()).await;

    let res = actix_test::call_service(
        &app,
        post(
            "/api/v1/signup",
            json!({
                "email": FixtureIdentityProvider::EMAIL,
                "password": "secret1",
                "confirmPassword": "secret1",
                "displayName": "Ada"
            }),
        ),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = error_body(res).await;
    assert_eq!(body["message"], "An account with this email already exists.");
}

#[rstest]
#[actix_web::test]
async fn signup_signs_the_new_account_in() {
    let app = actix_test::init_service(test_app()).await;

    let res = actix_test::call_service(
        &app,
        post(
            "/api/v1/signup",
            json!({
                "email": "new@example.com",
                "password": "secret1",
                "confirmPassword": "secret1",
                "displayName": " Ada Lovelace "
            }),
        ),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let cookie = session_cookie(&res);
    let created: Value = actix_test::read_body_json(res).await;
    assert_eq!(created["displayName"], "Ada Lovelace");
    let me = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(me.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(me).await;
    assert_eq!(body["email"], "new@example.com");
    assert_eq!(body["displayName"], "Ada Lovelace");
}

#[rstest]
#[actix_web::test]
async fn signup_without_a_display_name_is_rejected() {
    let app = actix_test::init_service(test_app()).await;

    let res = actix_test::call_service(
        &app,
        post(
            "/api/v1/signup",
            json!({
                "email": "new@example.com",
                "password": "secret1",
                "confirmPassword": "secret1"
            }),
        ),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(res).await["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn logout_forgets_the_user() {
    let app = actix_test::init_service(test_app()).await;
    let signed_in = actix_test::call_service(
        &app,
        post(
            "/api/v1/login",
            json!({
                "email": FixtureIdentityProvider::EMAIL,
                "password": FixtureIdentityProvider::PASSWORD
            }),
        ),
    )
    .await;
    let cookie = session_cookie(&signed_in);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let cleared = session_cookie(&res);

    let me = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case("diner@example.com", StatusCode::ACCEPTED)]
#[case("broken", StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn password_reset_checks_the_address(#[case] email: &str, #[case] expected: StatusCode) {
    let app = actix_test::init_service(test_app()).await;

    let res =
        actix_test::call_service(&app, post("/api/v1/password-reset", json!({ "email": email })))
            .await;

    assert_eq!(res.status(), expected);
}
