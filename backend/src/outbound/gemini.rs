//! Reqwest-backed Gemini text generation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use super::http_support::status_message;
use crate::domain::ports::{TextGenerator, TextGeneratorError};

/// Public Generative Language API root.
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
/// Model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// [`TextGenerator`] calling `models/{model}:generateContent`.
pub struct GeminiTextGenerator {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl GeminiTextGenerator {
    /// Build a generator for `model` whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the model name does not form a valid URL or the
    /// reqwest client cannot be constructed.
    pub fn new(
        base: &Url,
        model: &str,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, GeminiSetupError> {
        let endpoint = base.join(&format!("./models/{model}:generateContent"))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

/// Failure to construct a [`GeminiTextGenerator`].
#[derive(Debug, thiserror::Error)]
pub enum GeminiSetupError {
    #[error("invalid Gemini endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Concatenated text of the first candidate.
fn parse_text(body: &[u8]) -> Result<String, TextGeneratorError> {
    let decoded: GenerateResponse = serde_json::from_slice(body).map_err(|err| {
        TextGeneratorError::transport(format!("invalid Gemini payload: {err}"))
    })?;
    let text: String = decoded
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        Err(TextGeneratorError::empty())
    } else {
        Ok(text)
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> TextGeneratorError {
    TextGeneratorError::status(status.as_u16(), status_message(status, body))
}

#[async_trait]
impl TextGenerator for GeminiTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, TextGeneratorError> {
        let request = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|err| TextGeneratorError::transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| TextGeneratorError::transport(err.to_string()))?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        parse_text(&body)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network helpers.
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn joins_the_parts_of_the_first_candidate() {
        let body = br#"{
            "candidates": [
                {"content": {"parts": [{"text": "1. Trattoria Roma"}, {"text": "\n2. Le Petit"}], "role": "model"}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;

        assert_eq!(
            parse_text(body).expect("text"),
            "1. Trattoria Roma\n2. Le Petit"
        );
    }

    #[rstest]
    #[case(br#"{"candidates": []}"#.as_slice())]
    #[case(br#"{"promptFeedback": {"blockReason": "SAFETY"}}"#.as_slice())]
    #[case(br#"{"candidates": [{"finishReason": "SAFETY"}]}"#.as_slice())]
    #[case(br#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#.as_slice())]
    fn missing_text_is_empty(#[case] body: &[u8]) {
        assert_eq!(parse_text(body), Err(TextGeneratorError::empty()));
    }

    #[rstest]
    fn error_statuses_keep_the_code() {
        let err = map_status_error(StatusCode::TOO_MANY_REQUESTS, b"quota exceeded");

        assert_eq!(
            err,
            TextGeneratorError::status(429_u16, "status 429: quota exceeded")
        );
    }

    #[rstest]
    fn endpoint_names_the_model() {
        let generator = GeminiTextGenerator::new(
            &Url::parse(DEFAULT_GEMINI_URL).expect("url"),
            DEFAULT_GEMINI_MODEL,
            "key".into(),
            Duration::from_secs(1),
        )
        .expect("generator");

        assert_eq!(
            generator.endpoint.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
    }
}
