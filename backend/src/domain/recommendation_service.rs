//! Restaurant recommendations generated from a dining plan.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{RecommendationQuery, TextGenerator, TextGeneratorError};
use crate::domain::{DiningPlan, Error, Recommendations, recommendation_prompt};

fn map_generator_error(error: TextGeneratorError) -> Error {
    match error {
        TextGeneratorError::NotConfigured => {
            Error::service_unavailable("recommendations are not available")
        }
        TextGeneratorError::Transport { message } => {
            tracing::error!(%message, "text generation unavailable");
            Error::service_unavailable("recommendations are temporarily unavailable")
        }
        TextGeneratorError::Status { status, message } => {
            tracing::error!(status, %message, "text generation failed");
            Error::service_unavailable("recommendations are temporarily unavailable")
        }
        TextGeneratorError::Empty => Error::internal("text generation returned no content"),
    }
}

/// [`RecommendationQuery`] backed by a [`TextGenerator`].
pub struct RecommendationService<G: ?Sized> {
    generator: Arc<G>,
}

impl<G: ?Sized> RecommendationService<G> {
    pub fn new(generator: Arc<G>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl<G> RecommendationQuery for RecommendationService<G>
where
    G: TextGenerator + ?Sized,
{
    async fn recommend(&self, plan: &DiningPlan) -> Result<Recommendations, Error> {
        let prompt = recommendation_prompt(plan);
        let text = self
            .generator
            .generate(&prompt)
            .await
            .map_err(map_generator_error)?;
        Ok(Recommendations {
            title: plan.title(),
            text,
        })
    }
}
