//! Decorative image search.
//!
//! ```text
//! GET /api/v1/images?query=italian%20food
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::ImageResult;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::field_error;

/// Query string for `GET /api/v1/images`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImageSearchQuery {
    /// Search terms, e.g. a cuisine.
    #[serde(default)]
    #[param(example = "italian food")]
    pub query: String,
}

/// Images from the first provider that returns any.
///
/// Provider failures yield an empty list rather than an error.
#[utoipa::path(
    get,
    path = "/api/v1/images",
    params(ImageSearchQuery),
    responses(
        (status = 200, description = "Images, possibly none", body = [ImageResult]),
        (status = 400, description = "Blank query", body = ErrorSchema)
    ),
    tags = ["images"],
    operation_id = "searchImages",
    security([])
)]
#[get("/images")]
pub async fn search_images(
    state: web::Data<HttpState>,
    query: web::Query<ImageSearchQuery>,
) -> ApiResult<web::Json<Vec<ImageResult>>> {
    if query.query.trim().is_empty() {
        return Err(field_error("query", "empty_query", "query must not be empty"));
    }
    let images = state.images.images(&query.query).await?;
    Ok(web::Json(images))
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
    use crate::domain::ImageProvider;
    use crate::domain::ports::MockImageQuery;
    use crate::inbound::http::test_utils::memory_http_state;

    async fn get(state: HttpState, uri: &str) -> actix_web::dev::ServiceResponse {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api/v1").service(search_images)),
        )
        .await;
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await
    }

    #[rstest]
    #[actix_web::test]
    async fn returns_provider_images() {
        let mut images = MockImageQuery::new();
        images
            .expect_images()
            .withf(|query| query == "italian food")
            .return_once(|_| {
                Ok(vec![ImageResult {
                    url: "https://img.example/pasta.jpg".into(),
                    alt: "food, pasta".into(),
                    photographer: Some("Ada".into()),
                    provider: ImageProvider::Unsplash,
                }])
            });
        let mut state = memory_http_state();
        state.images = Arc::new(images);

        let res = get(state, "/api/v1/images?query=italian%20food").await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body,
            json!([{
                "url": "https://img.example/pasta.jpg",
                "alt": "food, pasta",
                "photographer": "Ada",
                "provider": "unsplash"
            }])
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn no_results_is_an_empty_list() {
        let res = get(memory_http_state(), "/api/v1/images?query=sushi").await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body, json!([]));
    }

    #[rstest]
    #[case("/api/v1/images")]
    #[case("/api/v1/images?query=%20%20")]
    #[actix_web::test]
    async fn blank_queries_are_rejected(#[case] uri: &str) {
        let res = get(memory_http_state(), uri).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
