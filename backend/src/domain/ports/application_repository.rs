//! Driven port for reading service applications.

use async_trait::async_trait;

use crate::domain::{ApplicationSummary, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by application repository adapters.
    pub enum ApplicationPersistenceError {
        /// No connection could be checked out of the pool.
        Connection { message: String } => "application repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "application repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// List applications submitted by `owner`, ordered by application id.
    ///
    /// Missing service or official references surface as `None` fields.
    async fn list_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<ApplicationSummary>, ApplicationPersistenceError>;
}
