//! Restaurant recommendation handler.
//!
//! ```text
//! POST /api/v1/recommendations {"location":"Boston","date":"2025-05-03",
//!                               "time":"7:00 PM","groupType":"couple","vibe":"romantic"}
//! ```

use actix_web::{post, web};

use crate::domain::{DiningWizard, PlanSubmission, Recommendations};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::wizard_error;

/// Suggest restaurants for a completed wizard plan.
#[utoipa::path(
    post,
    path = "/api/v1/recommendations",
    request_body = PlanSubmission,
    responses(
        (status = 200, description = "Generated suggestions", body = Recommendations),
        (status = 400, description = "A wizard step was incomplete", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Generator unavailable or not configured", body = ErrorSchema)
    ),
    tags = ["wizard"],
    operation_id = "recommendRestaurants"
)]
#[post("/recommendations")]
pub async fn recommend(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PlanSubmission>,
) -> ApiResult<web::Json<Recommendations>> {
    session.require_user_id()?;
    let today = state.clock.utc().date_naive();
    let plan = DiningWizard::replay(today, payload.into_inner()).map_err(wizard_error)?;
    let recommendations = state.recommendations.recommend(&plan).await?;
    Ok(web::Json(recommendations))
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
    use crate::domain::ports::{FixtureIdentityProvider, MockRecommendationQuery};
    use crate::inbound::http::test_utils::{
        memory_http_state, session_cookie, test_session_middleware,
    };
    use crate::inbound::http::users::login;

    fn plan() -> Value {
        json!({
            "location": "Boston",
            "date": "2025-05-03",
            "time": "7:00 PM",
            "groupType": "couple",
            "vibe": "romantic"
        })
    }

    async fn call(state: HttpState, body: Value) -> actix_web::dev::ServiceResponse {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(test_session_middleware())
                .service(web::scope("/api/v1").service(login).service(recommend)),
        )
        .await;
        let signed_in = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({
                    "email": FixtureIdentityProvider::EMAIL,
                    "password": FixtureIdentityProvider::PASSWORD
                }))
                .to_request(),
        )
        .await;
        actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/recommendations")
                .cookie(session_cookie(&signed_in))
                .set_json(body)
                .to_request(),
        )
        .await
    }

    #[rstest]
    #[actix_web::test]
    async fn returns_generated_suggestions_for_the_plan() {
        let mut query = MockRecommendationQuery::new();
        query
            .expect_recommend()
            .withf(|plan| plan.location == "Boston" && plan.title() == "Romantic couple outing in Boston")
            .return_once(|plan| {
                Ok(Recommendations {
                    title: plan.title(),
                    text: "1. Trattoria".into(),
                })
            });
        let mut state = memory_http_state();
        state.recommendations = Arc::new(query);

        let res = call(state, plan()).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["title"], "Romantic couple outing in Boston");
        assert_eq!(body["text"], "1. Trattoria");
    }

    #[rstest]
    #[actix_web::test]
    async fn unconfigured_generator_is_unavailable() {
        let res = call(memory_http_state(), plan()).await;

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[rstest]
    #[actix_web::test]
    async fn incomplete_plans_never_reach_the_generator() {
        let mut query = MockRecommendationQuery::new();
        query.expect_recommend().never();
        let mut state = memory_http_state();
        state.recommendations = Arc::new(query);

        let res = call(state, json!({ "location": "Boston" })).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
