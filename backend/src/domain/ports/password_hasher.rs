//! Driven port for password hashing and verification.

use async_trait::async_trait;

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hasher adapters.
    pub enum PasswordHashError {
        /// Producing a new hash failed.
        Hashing { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed or used for verification.
        MalformedHash { message: String } => "stored password hash unusable: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh random salt.
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Check `password` against `stored`; `Ok(false)` means a mismatch.
    async fn verify(&self, password: &str, stored: &PasswordHash)
    -> Result<bool, PasswordHashError>;
}
