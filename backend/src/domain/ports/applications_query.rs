//! Driving port for listing a user's applications.

use async_trait::async_trait;

use crate::domain::{ApplicationSummary, AuthenticatedCaller, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationsQuery: Send + Sync {
    /// List applications owned by `owner` on behalf of `caller`.
    ///
    /// Fails with [`ErrorCode::Forbidden`](crate::domain::ErrorCode::Forbidden)
    /// when the caller may not see that user's applications.
    async fn list_for_user(
        &self,
        caller: &AuthenticatedCaller,
        owner: UserId,
    ) -> Result<Vec<ApplicationSummary>, Error>;
}
