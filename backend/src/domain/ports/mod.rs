//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`LoginService`, `UserRegistration`, `ApplicationsQuery`) are
//! called by inbound adapters. Driven ports (`UserRepository`,
//! `ApplicationRepository`, `PasswordHasher`) are implemented by outbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod application_repository;
mod applications_query;
mod login_service;
mod password_hasher;
mod user_registration;
mod user_repository;

#[cfg(test)]
pub use application_repository::MockApplicationRepository;
pub use application_repository::{ApplicationPersistenceError, ApplicationRepository};
#[cfg(test)]
pub use applications_query::MockApplicationsQuery;
pub use applications_query::ApplicationsQuery;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use user_registration::MockUserRegistration;
pub use user_registration::UserRegistration;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
