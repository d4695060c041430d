//! Eatopia backend library: dining experience journal, planning wizard and
//! live dashboard behind a hexagonal boundary.
//!
//! - [`domain`]: entities, services and ports
//! - [`inbound`]: HTTP and WebSocket adapters
//! - [`outbound`]: persistence and hosted-service adapters
//! - [`settings`]: configuration loaded via OrthoConfig

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(test)]
pub(crate) mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
