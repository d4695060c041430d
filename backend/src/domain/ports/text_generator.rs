//! Ports for generated recommendation text.

use async_trait::async_trait;

use crate::domain::{DiningPlan, Error, Recommendations};

use super::define_port_error;

define_port_error! {
    /// Errors raised by text generation adapters.
    pub enum TextGeneratorError {
        /// No API key is configured.
        NotConfigured => "text generation is not configured",
        /// The request did not complete.
        Transport { message: String } => "text generation transport failed: {message}",
        /// The service answered with an error status.
        Status { status: u16, message: String } =>
            "text generation failed with status {status}: {message}",
        /// The response held no text.
        Empty => "text generation returned no content",
    }
}

/// Driven port for a generative text model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, TextGeneratorError>;
}

/// Generator used when no model is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTextGenerator;

#[async_trait]
impl TextGenerator for FixtureTextGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, TextGeneratorError> {
        Err(TextGeneratorError::not_configured())
    }
}

/// Driving port producing suggestions for a plan.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecommendationQuery: Send + Sync {
    async fn recommend(&self, plan: &DiningPlan) -> Result<Recommendations, Error>;
}
