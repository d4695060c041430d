//! Port for storing contact form messages.

use async_trait::async_trait;

use crate::domain::ContactMessage;

use super::define_port_error;

define_port_error! {
    /// Errors raised by contact repository adapters.
    pub enum ContactRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "contact repository connection failed: {message}",
        /// Insert failed during execution.
        Query { message: String } =>
            "contact repository query failed: {message}",
    }
}

/// Append-only store of contact messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Persist a message.
    async fn save(&self, message: &ContactMessage) -> Result<(), ContactRepositoryError>;
}

/// Fixture repository that accepts and discards messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureContactRepository;

#[async_trait]
impl ContactRepository for FixtureContactRepository {
    async fn save(&self, _message: &ContactMessage) -> Result<(), ContactRepositoryError> {
        Ok(())
    }
}
