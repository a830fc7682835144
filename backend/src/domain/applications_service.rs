//! Application listing use-case with ownership checks.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::ports::{
    ApplicationPersistenceError, ApplicationRepository, ApplicationsQuery,
};
use crate::domain::{ApplicationSummary, AuthenticatedCaller, Error, UserId};

/// Lists applications for an owner once the caller is cleared to see them.
#[derive(Clone)]
pub struct ApplicationsService<R> {
    applications: Arc<R>,
}

impl<R> ApplicationsService<R> {
    pub fn new(applications: Arc<R>) -> Self {
        Self { applications }
    }
}

fn map_persistence_error(err: ApplicationPersistenceError) -> Error {
    match err {
        ApplicationPersistenceError::Connection { .. } => Error::database_unavailable(),
        ApplicationPersistenceError::Query { .. } => {
            error!(error = %err, "application listing query failed");
            Error::internal("Error fetching applications")
        }
    }
}

#[async_trait]
impl<R> ApplicationsQuery for ApplicationsService<R>
where
    R: ApplicationRepository,
{
    async fn list_for_user(
        &self,
        caller: &AuthenticatedCaller,
        owner: UserId,
    ) -> Result<Vec<ApplicationSummary>, Error> {
        if !caller.may_view_applications_of(owner) {
            info!(
                caller = %caller.user_id(),
                owner = %owner,
                "application listing refused"
            );
            return Err(Error::forbidden("You may only view your own applications"));
        }

        let mut applications = self
            .applications
            .list_by_owner(owner)
            .await
            .map_err(map_persistence_error)?;

        let before = applications.len();
        applications.retain(|application| application.owner() == owner);
        if applications.len() != before {
            warn!(
                owner = %owner,
                dropped = before - applications.len(),
                "repository returned applications for another owner"
            );
        }
        Ok(applications)
    }
}
