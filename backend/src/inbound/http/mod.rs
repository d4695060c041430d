//! HTTP inbound adapter exposing REST endpoints under `/api/v1`.

pub mod contact;
pub mod error;
pub mod experiences;
pub mod health;
pub mod images;
pub mod recommendations;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;
pub mod wizard;

pub use error::ApiResult;
