//! Image search with ordered provider fallback.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{ImageQuery, ImageSearch};
use crate::domain::{Error, ImageResult, normalise_query};

/// Images requested from each provider.
pub const IMAGES_PER_QUERY: u8 = 10;

/// Tries each provider in turn and returns the first non-empty result.
///
/// Provider failures are logged and skipped. When every provider fails or
/// finds nothing the result is empty; decorative images never fail a page.
pub struct ImageSearchService {
    providers: Vec<Arc<dyn ImageSearch>>,
}

impl ImageSearchService {
    /// Providers are consulted in the given order.
    pub fn new(providers: Vec<Arc<dyn ImageSearch>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl ImageQuery for ImageSearchService {
    async fn images(&self, query: &str) -> Result<Vec<ImageResult>, Error> {
        let query = normalise_query(query)
            .ok_or_else(|| Error::invalid_request("query must not be empty"))?;

        for provider in &self.providers {
            match provider.search(&query, IMAGES_PER_QUERY).await {
                Ok(images) if !images.is_empty() => return Ok(images),
                Ok(_) => tracing::debug!(%query, "image provider returned no results"),
                Err(err) => {
                    tracing::warn!(%query, kind = err.kind(), error = %err, "image provider failed");
                }
            }
        }
        Ok(Vec::new())
    }
}
