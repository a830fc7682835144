//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    EmailAddress, FullName, NewUser, PasswordHash, Role, StoredCredentials, User, UserId,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed account repository.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(pool_error_message(error))
}

fn map_diesel_error(error: &diesel::result::Error) -> UserPersistenceError {
    let failure = classify_diesel_error(error);
    match failure {
        DieselFailure::Connection => UserPersistenceError::connection(failure.message()),
        DieselFailure::UniqueViolation => UserPersistenceError::duplicate_email(),
        DieselFailure::Query => UserPersistenceError::query(failure.message()),
    }
}

fn map_user_id(raw: i64) -> Result<UserId, UserPersistenceError> {
    UserId::new(raw)
        .map_err(|err| UserPersistenceError::query(format!("invalid user id {raw}: {err}")))
}

/// Convert a stored row into domain values.
///
/// Rows that violate domain invariants are reported as query failures rather
/// than silently repaired; an unknown role degrades to citizen.
fn row_to_credentials(row: UserRow) -> Result<StoredCredentials, UserPersistenceError> {
    let UserRow {
        id,
        full_name,
        email,
        password_hash,
        role,
    } = row;

    let id = map_user_id(id)?;
    let email = EmailAddress::new(&email).map_err(|err| {
        warn!(user_id = %id, %err, "stored email failed validation");
        UserPersistenceError::query("stored user has an invalid email")
    })?;
    let full_name = FullName::new(&full_name).map_err(|err| {
        warn!(user_id = %id, %err, "stored full name failed validation");
        UserPersistenceError::query("stored user has an invalid full name")
    })?;

    let user = User::new(id, email, Role::from_stored(&role), full_name);
    Ok(StoredCredentials::new(user, PasswordHash::new(password_hash)))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_id_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserId>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id: Option<i64> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(users::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?;

        id.map(map_user_id).transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?;

        row.map(row_to_credentials).transpose()
    }

    async fn insert(&self, user: &NewUser) -> Result<UserId, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            full_name: user.full_name().as_ref(),
            email: user.email().as_ref(),
            password_hash: user.password_hash().as_str(),
            role: user.role().as_str(),
        };

        let id: i64 = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(users::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;

        map_user_id(id)
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion and error mapping; queries need a live database.
    use super::*;
    use rstest::rstest;

    fn row(role: &str, email: &str) -> UserRow {
        UserRow {
            id: 12,
            full_name: "Jane Doe".to_owned(),
            email: email.to_owned(),
            password_hash: "$argon2id$stored".to_owned(),
            role: role.to_owned(),
        }
    }

    #[rstest]
    fn rows_convert_to_credentials() {
        let stored = row_to_credentials(row("official", "jane@x.com")).expect("valid row");
        assert_eq!(stored.password_hash().as_str(), "$argon2id$stored");

        let user = stored.into_user();
        assert_eq!(user.id().as_i64(), 12);
        assert_eq!(user.role(), Role::Official);
    }

    #[rstest]
    fn unknown_roles_become_citizens() {
        let user = row_to_credentials(row("superuser", "jane@x.com"))
            .expect("valid row")
            .into_user();
        assert_eq!(user.role(), Role::Citizen);
    }

    #[rstest]
    fn blank_stored_email_is_a_query_error() {
        let err = row_to_credentials(row("citizen", " ")).expect_err("invalid row");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, UserPersistenceError::connection("timed out"));
    }

    #[rstest]
    fn not_found_maps_to_query() {
        let err = map_diesel_error(&diesel::result::Error::NotFound);
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
