//! Driving port for self-registration.

use async_trait::async_trait;

use crate::domain::{Error, Registration, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistration: Send + Sync {
    /// Create a citizen account and return its id.
    async fn register(&self, registration: &Registration) -> Result<UserId, Error>;
}
