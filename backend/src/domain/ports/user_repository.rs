//! Driven port for account persistence.

use async_trait::async_trait;

use crate::domain::{EmailAddress, NewUser, StoredCredentials, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// No connection could be checked out of the pool.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The store's unique constraint on email rejected an insert.
        DuplicateEmail => "user repository rejected a duplicate email",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Return the id of the account registered under `email`, if any.
    async fn find_id_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserId>, UserPersistenceError>;

    /// Fetch the account and its stored password hash by email.
    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Insert a new account and return its assigned id.
    async fn insert(&self, user: &NewUser) -> Result<UserId, UserPersistenceError>;
}
