//! Contact form handler.
//!
//! ```text
//! POST /api/v1/contact {"name":"Ada","email":"ada@example.com","message":"Hello"}
//! ```
//!
//! The message is stored before the confirmation email is attempted. A
//! failed email still answers `200` with `emailSent: false`; only a failed
//! store is an error.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CONTACT_FAILURE_MESSAGE, ContactMessage, Error, ErrorCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::contact_validation_error;

/// Body for `POST /api/v1/contact`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default)]
    #[schema(example = "Ada")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// What happened to a contact submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub stored: bool,
    pub email_sent: bool,
    /// Status line to show the sender.
    #[schema(example = "Thanks! Please check your email for confirmation.")]
    pub message: String,
}

/// Store a contact message and send a best-effort confirmation.
#[utoipa::path(
    post,
    path = "/api/v1/contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Message stored", body = ContactResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Message could not be stored", body = ErrorSchema)
    ),
    tags = ["contact"],
    operation_id = "submitContact",
    security([])
)]
#[post("/contact")]
pub async fn submit_contact(
    state: web::Data<HttpState>,
    payload: web::Json<ContactRequest>,
) -> ApiResult<web::Json<ContactResponse>> {
    let ContactRequest {
        name,
        email,
        message,
    } = payload.into_inner();
    let contact = ContactMessage::new(&name, &email, &message, state.clock.utc())
        .map_err(contact_validation_error)?;
    let outcome = state.contact.submit(contact).await.map_err(|err| {
        if err.code() == ErrorCode::InvalidRequest {
            err
        } else {
            Error::service_unavailable(CONTACT_FAILURE_MESSAGE)
        }
    })?;
    if !outcome.email_sent {
        tracing::warn!("contact message stored without confirmation email");
    }
    Ok(web::Json(ContactResponse {
        stored: outcome.stored,
        email_sent: outcome.email_sent,
        message: outcome.status_message().to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ContactOutcome;
    use crate::domain::ports::MockContactSubmission;
    use crate::inbound::http::test_utils::memory_http_state;

    async fn call(state: HttpState, body: Value) -> actix_web::dev::ServiceResponse {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api/v1").service(submit_contact)),
        )
        .await;
        actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/contact")
                .set_json(body)
                .to_request(),
        )
        .await
    }

    fn form() -> Value {
        json!({ "name": "Ada", "email": "ada@example.com", "message": "Hello" })
    }

    fn with_outcome(result: Result<ContactOutcome, Error>) -> HttpState {
        let mut submission = MockContactSubmission::new();
        submission
            .expect_submit()
            .withf(|message| message.name() == "Ada" && message.message() == "Hello")
            .return_once(move |_| result);
        let mut state = memory_http_state();
        state.contact = Arc::new(submission);
        state
    }

    #[rstest]
    #[case(true, "Thanks! Please check your email for confirmation.")]
    #[case(false, "Message saved, but email failed.")]
    #[actix_web::test]
    async fn stored_messages_report_the_email_separately(
        #[case] email_sent: bool,
        #[case] message: &str,
    ) {
        let state = with_outcome(Ok(ContactOutcome {
            stored: true,
            email_sent,
        }));

        let res = call(state, form()).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body,
            json!({ "stored": true, "emailSent": email_sent, "message": message })
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn store_failures_use_the_generic_message() {
        let state = with_outcome(Err(Error::service_unavailable("database down")));

        let res = call(state, form()).await;

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["message"], CONTACT_FAILURE_MESSAGE);
    }

    #[rstest]
    #[case(json!({ "name": " ", "email": "ada@example.com", "message": "Hi" }), "name")]
    #[case(json!({ "name": "Ada", "email": "nope", "message": "Hi" }), "email")]
    #[case(json!({ "name": "Ada", "email": "ada@example.com", "message": "" }), "message")]
    #[actix_web::test]
    async fn invalid_forms_are_rejected_before_storing(#[case] body: Value, #[case] field: &str) {
        let mut submission = MockContactSubmission::new();
        submission.expect_submit().never();
        let mut state = memory_http_state();
        state.contact = Arc::new(submission);

        let res = call(state, body).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], field);
    }
}
