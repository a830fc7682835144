//! Self-registration use-case.
//!
//! Checks the email is free, hashes the password, and inserts a citizen
//! account. The store's unique constraint backstops the check-then-insert
//! race and is reported as the same conflict.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::ports::{
    PasswordHashError, PasswordHasher, UserPersistenceError, UserRegistration, UserRepository,
};
use crate::domain::{Error, NewUser, Registration, UserId};

const EMAIL_TAKEN_MESSAGE: &str = "An account with this email already exists.";
const LOOKUP_FAILED_MESSAGE: &str = "Error checking user existence";
const INSERT_FAILED_MESSAGE: &str = "Could not create user account.";

/// Registration service backed by a user repository and a password hasher.
#[derive(Clone)]
pub struct RegistrationService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> RegistrationService<R, H> {
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

fn map_lookup_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::Connection { .. } => Error::database_unavailable(),
        UserPersistenceError::Query { .. } | UserPersistenceError::DuplicateEmail => {
            error!(error = %err, "email lookup failed during registration");
            Error::internal(LOOKUP_FAILED_MESSAGE)
        }
    }
}

fn map_insert_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::Connection { .. } => Error::database_unavailable(),
        UserPersistenceError::DuplicateEmail => {
            info!("registration lost an insert race on email");
            Error::conflict(EMAIL_TAKEN_MESSAGE)
        }
        UserPersistenceError::Query { .. } => {
            error!(error = %err, "user insert failed");
            Error::internal(INSERT_FAILED_MESSAGE)
        }
    }
}

fn map_hash_error(err: &PasswordHashError) -> Error {
    error!(error = %err, "password hashing failed during registration");
    Error::internal(INSERT_FAILED_MESSAGE)
}

#[async_trait]
impl<R, H> UserRegistration for RegistrationService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: &Registration) -> Result<UserId, Error> {
        let existing = self
            .users
            .find_id_by_email(registration.email())
            .await
            .map_err(map_lookup_error)?;
        if existing.is_some() {
            info!("registration rejected: email already registered");
            return Err(Error::conflict(EMAIL_TAKEN_MESSAGE));
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(|err| map_hash_error(&err))?;

        let new_user = NewUser::citizen(
            registration.full_name().clone(),
            registration.email().clone(),
            password_hash,
        );
        let user_id = self
            .users
            .insert(&new_user)
            .await
            .map_err(map_insert_error)?;

        info!(user_id = %user_id, "citizen account registered");
        Ok(user_id)
    }
}

#[cfg(test)]
#[path = "registration_service_tests.rs"]
mod tests;
