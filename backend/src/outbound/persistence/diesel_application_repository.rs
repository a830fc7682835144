//! PostgreSQL-backed `ApplicationRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ApplicationPersistenceError, ApplicationRepository};
use crate::domain::{ApplicationSummary, ApplicationSummaryParts, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::ApplicationRow;
use super::pool::{DbPool, PoolError};
use super::schema::{applications, services, users};

/// Diesel-backed read-only application repository.
#[derive(Clone)]
pub struct DieselApplicationRepository {
    pool: DbPool,
}

impl DieselApplicationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ApplicationPersistenceError {
    ApplicationPersistenceError::connection(pool_error_message(error))
}

fn map_diesel_error(error: &diesel::result::Error) -> ApplicationPersistenceError {
    let failure = classify_diesel_error(error);
    match failure {
        DieselFailure::Connection => ApplicationPersistenceError::connection(failure.message()),
        DieselFailure::UniqueViolation | DieselFailure::Query => {
            ApplicationPersistenceError::query(failure.message())
        }
    }
}

fn row_to_summary(row: ApplicationRow) -> Result<ApplicationSummary, ApplicationPersistenceError> {
    let owner = UserId::new(row.user_id).map_err(|err| {
        ApplicationPersistenceError::query(format!(
            "application {} has invalid owner {}: {err}",
            row.id, row.user_id
        ))
    })?;

    Ok(ApplicationSummary::from(ApplicationSummaryParts {
        id: row.id,
        owner,
        service_name: row.service_name,
        status: row.status,
        submitted_on: row.submitted_on,
        last_update: row.last_update,
        current_official: row.current_official,
    }))
}

#[async_trait]
impl ApplicationRepository for DieselApplicationRepository {
    async fn list_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<ApplicationSummary>, ApplicationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // `users` joins on the handling official, not the owner.
        let rows: Vec<ApplicationRow> = applications::table
            .left_join(services::table.on(applications::service_id.eq(services::id.nullable())))
            .left_join(
                users::table.on(applications::current_official_id.eq(users::id.nullable())),
            )
            .filter(applications::user_id.eq(owner.as_i64()))
            .order(applications::id.asc())
            .select((
                applications::id,
                applications::user_id,
                services::name.nullable(),
                applications::status,
                applications::submitted_on,
                applications::last_update,
                users::full_name.nullable(),
            ))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;

        rows.into_iter().map(row_to_summary).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion and error mapping; queries need a live database.
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn row(user_id: i64) -> ApplicationRow {
        ApplicationRow {
            id: 8,
            user_id,
            service_name: None,
            status: "approved".to_owned(),
            submitted_on: Utc
                .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
                .single()
                .expect("valid timestamp"),
            last_update: None,
            current_official: Some("Ravi Kumar".to_owned()),
        }
    }

    #[rstest]
    fn rows_keep_nullable_references() {
        let summary = row_to_summary(row(3)).expect("valid row");

        assert_eq!(summary.owner().as_i64(), 3);
        assert_eq!(summary.service_name(), None);
        assert_eq!(summary.current_official(), Some("Ravi Kumar"));
        assert_eq!(summary.status(), "approved");
    }

    #[rstest]
    fn invalid_owner_is_a_query_error() {
        let err = row_to_summary(row(0)).expect_err("invalid owner");
        assert!(matches!(err, ApplicationPersistenceError::Query { .. }));
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let err = map_pool_error(PoolError::checkout("refused"));
        assert_eq!(err, ApplicationPersistenceError::connection("refused"));
    }
}
