//! In-memory adapters for tests.
//!
//! Shared by unit tests and the integration suite under `tests/` (via the
//! `test-support` feature) so HTTP flows run end to end without PostgreSQL.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use argon2::Params;
use async_trait::async_trait;

use crate::domain::ports::{
    ApplicationPersistenceError, ApplicationRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{
    ApplicationSummary, ApplicationsService, EmailAddress, NewUser, PasswordLoginService,
    RegistrationService, StoredCredentials, User, UserId,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::security::Argon2PasswordHasher;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// User store keyed by email, assigning sequential ids from 1.
#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<HashMap<String, StoredCredentials>>,
    offline: Mutex<bool>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call fail as if the database were unreachable.
    pub fn go_offline(&self) {
        *lock(&self.offline) = true;
    }

    /// Number of stored users with `email`.
    pub fn count_by_email(&self, email: &str) -> usize {
        usize::from(lock(&self.rows).contains_key(email.trim()))
    }

    /// Stored account for `email`, without its credential.
    pub fn user_by_email(&self, email: &str) -> Option<User> {
        lock(&self.rows)
            .get(email.trim())
            .map(|stored| stored.clone().into_user())
    }

    fn check_online(&self) -> Result<(), UserPersistenceError> {
        if *lock(&self.offline) {
            return Err(UserPersistenceError::connection("database offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_id_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserId>, UserPersistenceError> {
        self.check_online()?;
        Ok(lock(&self.rows)
            .get(email.as_ref())
            .map(|stored| stored.clone().into_user().id()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        self.check_online()?;
        Ok(lock(&self.rows).get(email.as_ref()).cloned())
    }

    async fn insert(&self, user: &NewUser) -> Result<UserId, UserPersistenceError> {
        self.check_online()?;
        let mut rows = lock(&self.rows);
        if rows.contains_key(user.email().as_ref()) {
            return Err(UserPersistenceError::duplicate_email());
        }
        let next = i64::try_from(rows.len())
            .map_err(|err| UserPersistenceError::query(err.to_string()))?
            + 1;
        let id = UserId::new(next).map_err(|err| UserPersistenceError::query(err.to_string()))?;
        let stored = StoredCredentials::new(
            User::new(id, user.email().clone(), user.role(), user.full_name().clone()),
            user.password_hash().clone(),
        );
        rows.insert(user.email().as_ref().to_owned(), stored);
        Ok(id)
    }
}

/// Read-only application store seeded up front.
#[derive(Default)]
pub struct InMemoryApplicationRepository {
    rows: Vec<ApplicationSummary>,
}

impl InMemoryApplicationRepository {
    pub fn new(rows: Vec<ApplicationSummary>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn list_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<ApplicationSummary>, ApplicationPersistenceError> {
        let mut owned: Vec<_> = self
            .rows
            .iter()
            .filter(|row| row.owner() == owner)
            .cloned()
            .collect();
        owned.sort_by_key(ApplicationSummary::id);
        Ok(owned)
    }
}

/// Argon2id hasher with minimal cost parameters.
pub fn fast_password_hasher() -> Argon2PasswordHasher {
    let params = Params::new(256, 1, 1, None).unwrap_or_else(|_| Params::default());
    Argon2PasswordHasher::with_params(params)
}

/// HTTP state wired to real domain services over in-memory adapters.
pub fn http_state(
    users: Arc<InMemoryUserRepository>,
    applications: Arc<InMemoryApplicationRepository>,
) -> HttpState {
    let hasher = Arc::new(fast_password_hasher());
    HttpState::new(
        Arc::new(RegistrationService::new(users.clone(), hasher.clone())),
        Arc::new(PasswordLoginService::new(users, hasher)),
        Arc::new(ApplicationsService::new(applications)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FullName, PasswordHash};
    use rstest::rstest;

    fn new_user(email: &str) -> NewUser {
        NewUser::citizen(
            FullName::new("Jane Doe").expect("name"),
            EmailAddress::new(email).expect("email"),
            PasswordHash::new("$argon2id$x"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_emails_are_rejected() {
        let repo = InMemoryUserRepository::new();
        let first = repo.insert(&new_user("jane@x.com")).await.expect("insert");
        let second = repo.insert(&new_user("jane@x.com")).await;

        assert_eq!(first.as_i64(), 1);
        assert_eq!(second, Err(UserPersistenceError::duplicate_email()));
        assert_eq!(repo.count_by_email("jane@x.com"), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn offline_store_reports_connection_errors() {
        let repo = InMemoryUserRepository::new();
        repo.go_offline();

        let err = repo
            .find_id_by_email(&EmailAddress::new("jane@x.com").expect("email"))
            .await
            .expect_err("offline");
        assert!(matches!(err, UserPersistenceError::Connection { .. }));
    }
}
