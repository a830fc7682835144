//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations of the domain's driven ports, backed by
//! `diesel-async` connections from a `bb8` pool.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) stay private to this module.
//! - **One checkout per call**: each repository method checks out a
//!   connection and releases it on return.
//! - **Typed errors**: pool and Diesel failures map to port error enums.
//!
//! # Example
//!
//! ```no_run
//! use darpan_backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn wire() {
//! let pool = DbPool::new(&PoolConfig::new("postgres://localhost/darpan_db"));
//! let users = DieselUserRepository::new(pool);
//! # }
//! ```

mod diesel_application_repository;
mod diesel_error_mapping;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_application_repository::DieselApplicationRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
