//! Reqwest-backed Unsplash photo search.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use super::http_support::status_message;
use crate::domain::ports::{ImageSearch, ImageSearchError};
use crate::domain::{DEFAULT_IMAGE_ALT, ImageProvider, ImageResult};

/// Public Unsplash API root.
pub const DEFAULT_UNSPLASH_URL: &str = "https://api.unsplash.com/";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<PhotoDto>,
}

#[derive(Debug, Deserialize)]
struct PhotoDto {
    urls: PhotoUrls,
    alt_description: Option<String>,
    user: Option<Photographer>,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

#[derive(Debug, Deserialize)]
struct Photographer {
    name: String,
}

impl From<PhotoDto> for ImageResult {
    fn from(photo: PhotoDto) -> Self {
        Self {
            url: photo.urls.regular,
            alt: photo
                .alt_description
                .filter(|alt| !alt.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_IMAGE_ALT.to_owned()),
            photographer: photo.user.map(|user| user.name),
            provider: ImageProvider::Unsplash,
        }
    }
}

/// [`ImageSearch`] over the Unsplash search endpoint.
///
/// Without an access key every search fails with `NotConfigured`, letting the
/// fallback chain move on.
pub struct UnsplashImageSearch {
    client: Client,
    base: Url,
    access_key: Option<String>,
}

impl UnsplashImageSearch {
    /// Build an adapter whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        access_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            access_key,
        })
    }
}

fn parse_photos(body: &[u8]) -> Result<Vec<ImageResult>, ImageSearchError> {
    let decoded: SearchResponse = serde_json::from_slice(body)
        .map_err(|err| ImageSearchError::decode(format!("invalid Unsplash payload: {err}")))?;
    Ok(decoded.results.into_iter().map(ImageResult::from).collect())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ImageSearchError {
    ImageSearchError::status(status.as_u16(), status_message(status, body))
}

#[async_trait]
impl ImageSearch for UnsplashImageSearch {
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<ImageResult>, ImageSearchError> {
        let Some(access_key) = self.access_key.as_deref() else {
            return Err(ImageSearchError::not_configured(ImageProvider::Unsplash));
        };
        let url = self
            .base
            .join("search/photos")
            .map_err(|err| ImageSearchError::transport(err.to_string()))?;
        let per_page = limit.to_string();
        let response = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, format!("Client-ID {access_key}"))
            .query(&[
                ("query", query),
                ("page", "1"),
                ("per_page", per_page.as_str()),
                ("orientation", "landscape"),
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
        let mut photos = parse_photos(&body)?;
        photos.truncate(usize::from(limit));
        Ok(photos)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network helpers.
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn photos_map_to_images() {
        let body = br#"{
            "total": 2,
            "results": [
                {"urls": {"regular": "https://images.unsplash.com/a"}, "alt_description": "bowl of ramen", "user": {"name": "Kenji"}},
                {"urls": {"regular": "https://images.unsplash.com/b"}, "alt_description": null, "user": null}
            ]
        }"#;

        let images = parse_photos(body).expect("valid payload");

        assert_eq!(
            images,
            vec![
                ImageResult {
                    url: "https://images.unsplash.com/a".into(),
                    alt: "bowl of ramen".into(),
                    photographer: Some("Kenji".into()),
                    provider: ImageProvider::Unsplash,
                },
                ImageResult {
                    url: "https://images.unsplash.com/b".into(),
                    alt: DEFAULT_IMAGE_ALT.into(),
                    photographer: None,
                    provider: ImageProvider::Unsplash,
                },
            ]
        );
    }

    #[rstest]
    fn malformed_payloads_are_decode_errors() {
        let err = parse_photos(b"{\"results\": 3}").expect_err("not a list");

        assert!(matches!(err, ImageSearchError::Decode { .. }));
    }

    #[rstest]
    fn rate_limits_keep_the_status() {
        let err = map_status_error(StatusCode::FORBIDDEN, b"Rate Limit Exceeded");

        assert_eq!(
            err,
            ImageSearchError::status(403_u16, "status 403: Rate Limit Exceeded")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn missing_keys_report_not_configured() {
        let search = UnsplashImageSearch::new(
            Url::parse(DEFAULT_UNSPLASH_URL).expect("url"),
            None,
            Duration::from_secs(1),
        )
        .expect("client");

        let err = search.search("pasta", 10).await.expect_err("no key");

        assert_eq!(err, ImageSearchError::not_configured(ImageProvider::Unsplash));
    }
}
