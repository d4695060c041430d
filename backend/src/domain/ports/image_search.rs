//! Ports for decorative image search.

use async_trait::async_trait;

use crate::domain::{Error, ImageProvider, ImageResult};

use super::define_port_error;

define_port_error! {
    /// Errors raised by image search adapters.
    pub enum ImageSearchError {
        /// The provider has no credentials configured.
        NotConfigured { provider: ImageProvider } => "{provider} is not configured",
        /// The request did not complete.
        Transport { message: String } => "image search transport failed: {message}",
        /// The provider answered with an error status.
        Status { status: u16, message: String } =>
            "image search failed with status {status}: {message}",
        /// The response could not be decoded.
        Decode { message: String } => "image search response invalid: {message}",
    }
}

/// Driven port for one stock photo provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// Up to `limit` landscape images matching `query`.
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<ImageResult>, ImageSearchError>;
}

/// Provider that never finds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureImageSearch;

#[async_trait]
impl ImageSearch for FixtureImageSearch {
    async fn search(&self, _query: &str, _limit: u8) -> Result<Vec<ImageResult>, ImageSearchError> {
        Ok(Vec::new())
    }
}

/// Driving port used by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageQuery: Send + Sync {
    /// Images for `query`, trying providers in order.
    async fn images(&self, query: &str) -> Result<Vec<ImageResult>, Error>;
}
