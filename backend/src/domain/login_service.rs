//! Credential login use-case.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::ports::{
    LoginService, PasswordHashError, PasswordHasher, UserPersistenceError, UserRepository,
};
use crate::domain::{Error, LoginCredentials, User};

const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Login service verifying submitted passwords against stored hashes.
#[derive(Clone)]
pub struct PasswordLoginService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> PasswordLoginService<R, H> {
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized(INVALID_CREDENTIALS_MESSAGE)
}

fn map_lookup_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::Connection { .. } => Error::database_unavailable(),
        UserPersistenceError::Query { .. } | UserPersistenceError::DuplicateEmail => {
            error!(error = %err, "credential lookup failed");
            Error::internal("Error checking credentials")
        }
    }
}

fn map_verify_error(err: PasswordHashError) -> Error {
    match err {
        PasswordHashError::MalformedHash { .. } => {
            warn!(error = %err, "stored password hash is unusable; rejecting login");
            invalid_credentials()
        }
        PasswordHashError::Hashing { .. } => {
            error!(error = %err, "password verification failed");
            Error::internal("Error checking credentials")
        }
    }
}

#[async_trait]
impl<R, H> LoginService for PasswordLoginService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(stored) = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_lookup_error)?
        else {
            info!("login rejected: unknown email");
            return Err(invalid_credentials());
        };

        let verified = self
            .hasher
            .verify(credentials.password(), stored.password_hash())
            .await
            .map_err(map_verify_error)?;
        if !verified {
            info!("login rejected: password mismatch");
            return Err(invalid_credentials());
        }

        let user = stored.into_user();
        info!(user_id = %user.id(), role = %user.role(), "login succeeded");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockPasswordHasher, MockUserRepository};
    use crate::domain::{
        EmailAddress, ErrorCode, FullName, PasswordHash, Role, StoredCredentials, UserId,
    };
    use rstest::{fixture, rstest};

    type Service = PasswordLoginService<MockUserRepository, MockPasswordHasher>;

    fn make_service(repo: MockUserRepository, hasher: MockPasswordHasher) -> Service {
        PasswordLoginService::new(Arc::new(repo), Arc::new(hasher))
    }

    #[fixture]
    fn credentials() -> LoginCredentials {
        LoginCredentials::try_from_parts("jane@x.com", "pw1").expect("valid credentials")
    }

    fn jane() -> User {
        User::new(
            UserId::new(4).expect("id"),
            EmailAddress::new("jane@x.com").expect("email"),
            Role::Citizen,
            FullName::new("Jane Doe").expect("name"),
        )
    }

    fn repo_with_jane() -> MockUserRepository {
        let mut repo = MockUserRepository::new();
        repo.expect_find_credentials_by_email()
            .times(1)
            .return_once(|_| {
                Ok(Some(StoredCredentials::new(
                    jane(),
                    PasswordHash::new("$argon2id$stored"),
                )))
            });
        repo
    }

    fn hasher_verifying(result: Result<bool, PasswordHashError>) -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_verify()
            .withf(|password, stored| {
                password.to_string() == "pw1" && stored.as_str() == "$argon2id$stored"
            })
            .times(1)
            .return_once(move |_, _| result);
        hasher
    }

    #[rstest]
    #[tokio::test]
    async fn matching_password_returns_user(credentials: LoginCredentials) {
        let service = make_service(repo_with_jane(), hasher_verifying(Ok(true)));
        let user = service.authenticate(&credentials).await.expect("login succeeds");
        assert_eq!(user, jane());
    }

    #[rstest]
    #[case::mismatch(Ok(false))]
    #[case::malformed(Err(PasswordHashError::malformed_hash("hashed_pw1")))]
    #[tokio::test]
    async fn bad_passwords_and_hashes_are_unauthorised(
        credentials: LoginCredentials,
        #[case] outcome: Result<bool, PasswordHashError>,
    ) {
        let service = make_service(repo_with_jane(), hasher_verifying(outcome));
        let err = service.authenticate(&credentials).await.expect_err("login fails");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "Invalid email or password");
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_email_matches_wrong_password_response(credentials: LoginCredentials) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_credentials_by_email()
            .times(1)
            .return_once(|_| Ok(None));
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().never();

        let unknown = make_service(repo, hasher)
            .authenticate(&credentials)
            .await
            .expect_err("unknown email");
        let mismatch = make_service(repo_with_jane(), hasher_verifying(Ok(false)))
            .authenticate(&credentials)
            .await
            .expect_err("wrong password");

        assert_eq!(unknown, mismatch);
    }

    #[rstest]
    #[tokio::test]
    async fn connection_failure_is_database_unavailable(credentials: LoginCredentials) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_credentials_by_email()
            .times(1)
            .return_once(|_| Err(UserPersistenceError::connection("timed out")));

        let err = make_service(repo, MockPasswordHasher::new())
            .authenticate(&credentials)
            .await
            .expect_err("db down");
        assert_eq!(err.code(), ErrorCode::DatabaseUnavailable);
    }
}
