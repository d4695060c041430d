//! Dining wizard handlers.
//!
//! ```text
//! GET  /api/v1/wizard/options
//! POST /api/v1/plans {"location":"Boston","date":"2025-05-03","time":"7:00 PM",
//!                     "groupType":"couple","vibe":"romantic","restaurant":"Trattoria"}
//! ```
//!
//! The wizard keeps no server-side state. A plan is submitted whole and
//! replayed through every step, so the gating rules are the same ones the
//! step-by-step flow applies.

use actix_web::{HttpResponse, get, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CreateExperienceRequest, CreateExperienceResponse};
use crate::domain::{DiningWizard, GroupType, PlanSubmission, TimeSlot, Vibe, bookable_dates};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{experience_validation_error, wizard_error};

/// A selectable option with its wire value and display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct WizardChoice {
    #[schema(example = "loud-af")]
    pub value: &'static str,
    #[schema(example = "Loud AF")]
    pub label: &'static str,
}

/// Everything the wizard lets the user pick from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WizardOptions {
    /// Thirty consecutive dates starting today.
    pub dates: Vec<NaiveDate>,
    #[schema(example = json!(["12:00 PM", "12:30 PM"]))]
    pub time_slots: Vec<String>,
    pub group_types: Vec<WizardChoice>,
    pub vibes: Vec<WizardChoice>,
}

impl WizardOptions {
    fn for_day(today: NaiveDate) -> Self {
        Self {
            dates: bookable_dates(today),
            time_slots: TimeSlot::all().map(TimeSlot::label).collect(),
            group_types: GroupType::ALL
                .iter()
                .map(|option| WizardChoice {
                    value: option.as_str(),
                    label: option.label(),
                })
                .collect(),
            vibes: Vibe::ALL
                .iter()
                .map(|option| WizardChoice {
                    value: option.as_str(),
                    label: option.label(),
                })
                .collect(),
        }
    }
}

/// Body for `POST /api/v1/plans`: the wizard answers plus where to eat.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    #[serde(flatten)]
    pub plan: PlanSubmission,
    #[serde(default)]
    #[schema(example = "Trattoria")]
    pub restaurant: String,
}

/// Options offered by the wizard steps.
#[utoipa::path(
    get,
    path = "/api/v1/wizard/options",
    responses((status = 200, description = "Wizard options", body = WizardOptions)),
    tags = ["wizard"],
    operation_id = "wizardOptions",
    security([])
)]
#[get("/wizard/options")]
pub async fn wizard_options(state: web::Data<HttpState>) -> web::Json<WizardOptions> {
    web::Json(WizardOptions::for_day(state.clock.utc().date_naive()))
}

/// Replay the wizard and record the resulting plan as an experience.
#[utoipa::path(
    post,
    path = "/api/v1/plans",
    request_body = PlanRequest,
    responses(
        (status = 201, description = "Plan recorded", body = CreateExperienceResponse),
        (status = 400, description = "A wizard step was incomplete", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["wizard"],
    operation_id = "createPlan"
)]
#[post("/plans")]
pub async fn create_plan(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PlanRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let PlanRequest { plan, restaurant } = payload.into_inner();
    let today = state.clock.utc().date_naive();
    let plan = DiningWizard::replay(today, plan).map_err(wizard_error)?;
    let details = plan
        .into_experience_details(&restaurant)
        .map_err(experience_validation_error)?;
    let created = state
        .experiences
        .create(CreateExperienceRequest { user_id, details })
        .await?;
    Ok(HttpResponse::Created()
        .insert_header(("Location", format!("/api/v1/experiences/{}", created.id)))
        .json(created))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::FixtureIdentityProvider;
    use crate::inbound::http::experiences::get_experience;
    use crate::inbound::http::test_utils::{
        memory_http_state, session_cookie, test_session_middleware,
    };
    use crate::inbound::http::users::login;

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
            .wrap(test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(login)
                    .service(wizard_options)
                    .service(create_plan)
                    .service(get_experience),
            )
    }

    fn plan(overrides: Value) -> Value {
        let mut body = json!({
            "location": "Boston",
            "date": "2025-05-03",
            "time": "7:00 PM",
            "groupType": "couple",
            "vibe": "romantic",
            "restaurant": "Trattoria"
        });
        if let (Some(base), Some(extra)) = (body.as_object_mut(), overrides.as_object()) {
            for (key, value) in extra {
                base.insert(key.clone(), value.clone());
            }
        }
        body
    }

    #[rstest]
    #[actix_web::test]
    async fn options_start_today_and_list_every_choice() {
        let app = actix_test::init_service(test_app()).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/wizard/options")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        let dates = body["dates"].as_array().expect("dates");
        assert_eq!(dates.len(), 30);
        assert_eq!(dates[0], "2025-05-01");
        assert_eq!(dates[29], "2025-05-30");
        assert_eq!(body["timeSlots"][0], "12:00 PM");
        assert_eq!(body["groupTypes"].as_array().map(Vec::len), Some(4));
        assert_eq!(body["vibes"][3], json!({ "value": "loud-af", "label": "Loud AF" }));
    }

    #[rstest]
    #[actix_web::test]
    async fn a_complete_plan_becomes_an_upcoming_experience() {
        let app = actix_test::init_service(test_app()).await;
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
        let cookie = session_cookie(&signed_in);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/plans")
                .cookie(cookie.clone())
                .set_json(plan(json!({})))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: Value = actix_test::read_body_json(res).await;
        assert_eq!(created["status"], "upcoming");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!(
                    "/api/v1/experiences/{}",
                    created["id"].as_str().expect("id")
                ))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let experience: Value = actix_test::read_body_json(res).await;
        assert_eq!(experience["name"], "Romantic couple outing in Boston");
        assert_eq!(experience["date"], "2025-05-03T19:00:00Z");
        assert_eq!(experience["guests"], 2);
    }

    #[rstest]
    #[case(json!({ "location": "   " }), "location", "empty_location")]
    #[case(json!({ "date": null }), "date", "missing_date")]
    #[case(json!({ "date": "2025-07-01" }), "date", "date_unavailable")]
    #[case(json!({ "time": "3:00 AM" }), "time", "unknown_option")]
    #[case(json!({ "groupType": null }), "groupType", "missing_group_type")]
    #[case(json!({ "vibe": "sleepy" }), "vibe", "unknown_option")]
    #[case(json!({ "restaurant": "" }), "restaurant", "empty_field")]
    #[actix_web::test]
    async fn incomplete_plans_name_the_failing_step(
        #[case] overrides: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let app = actix_test::init_service(test_app()).await;
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

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/plans")
                .cookie(session_cookie(&signed_in))
                .set_json(plan(overrides))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["code"], code);
    }
}
