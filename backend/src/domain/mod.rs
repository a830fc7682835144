//! Domain primitives, ports, and use-case services.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters, the ports they meet at, and the services implementing the
//! driving ports. Nothing here depends on actix or Diesel.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure taxonomy.
//! - `User`, `UserId`, `EmailAddress`, `FullName`, `Role`: account model.
//! - `LoginCredentials`, `Registration`, `AuthenticatedCaller`: validated
//!   request inputs and session identity.
//! - `ApplicationSummary`: listing read model.
//! - `RegistrationService`, `PasswordLoginService`, `ApplicationsService`:
//!   driving-port implementations.

pub mod application;
pub mod applications_service;
pub mod auth;
pub mod error;
pub mod login_service;
pub mod ports;
pub mod registration_service;
pub mod summary;
pub mod trace_id;
pub mod user;

pub use self::application::{ApplicationSummary, ApplicationSummaryParts};
pub use self::applications_service::ApplicationsService;
pub use self::auth::{
    AuthenticatedCaller, CredentialsValidationError, LoginCredentials, PasswordHash, Registration,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::login_service::PasswordLoginService;
pub use self::registration_service::RegistrationService;
pub use self::summary::generate_summary;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, FullName, NewUser, Role, StoredCredentials, User, UserId, UserValidationError,
};
