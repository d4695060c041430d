//! Reqwest-backed Pixabay photo search.
//!
//! Pixabay has no alt text; it is derived from the image tags.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use super::http_support::status_message;
use crate::domain::ports::{ImageSearch, ImageSearchError};
use crate::domain::{ImageProvider, ImageResult, alt_from_tags};

/// Public Pixabay API endpoint.
pub const DEFAULT_PIXABAY_URL: &str = "https://pixabay.com/api/";

/// Pixabay rejects `per_page` outside this range.
const PER_PAGE_RANGE: (u8, u8) = (3, 200);

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<HitDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HitDto {
    #[serde(rename = "largeImageURL")]
    large_image_url: Option<String>,
    #[serde(rename = "webformatURL")]
    webformat_url: Option<String>,
    #[serde(default)]
    tags: String,
    user: Option<String>,
}

impl HitDto {
    fn into_image(self) -> Option<ImageResult> {
        let url = self.large_image_url.or(self.webformat_url)?;
        Some(ImageResult {
            url,
            alt: alt_from_tags(&self.tags),
            photographer: self.user.filter(|user| !user.is_empty()),
            provider: ImageProvider::Pixabay,
        })
    }
}

/// [`ImageSearch`] over the Pixabay API, restricted to large food photos.
pub struct PixabayImageSearch {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl PixabayImageSearch {
    /// Build an adapter whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

fn parse_hits(body: &[u8]) -> Result<Vec<ImageResult>, ImageSearchError> {
    let decoded: SearchResponse = serde_json::from_slice(body)
        .map_err(|err| ImageSearchError::decode(format!("invalid Pixabay payload: {err}")))?;
    Ok(decoded.hits.into_iter().filter_map(HitDto::into_image).collect())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ImageSearchError {
    ImageSearchError::status(status.as_u16(), status_message(status, body))
}

#[async_trait]
impl ImageSearch for PixabayImageSearch {
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<ImageResult>, ImageSearchError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ImageSearchError::not_configured(ImageProvider::Pixabay));
        };
        let per_page = limit.clamp(PER_PAGE_RANGE.0, PER_PAGE_RANGE.1).to_string();
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("key", api_key),
                ("q", query),
                ("image_type", "photo"),
                ("orientation", "horizontal"),
                ("category", "food"),
                ("min_width", "1920"),
                ("min_height", "1080"),
                ("safesearch", "true"),
                ("page", "1"),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await
            .map_err(|err| ImageSearchError::transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| ImageSearchError::transport(err.to_string()))?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        let mut images = parse_hits(&body)?;
        images.truncate(usize::from(limit));
        Ok(images)
    }
}
