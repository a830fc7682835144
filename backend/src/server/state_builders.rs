//! Wiring of persistence and security adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;

use darpan_backend::domain::{ApplicationsService, PasswordLoginService, RegistrationService};
use darpan_backend::inbound::http::state::HttpState;
use darpan_backend::outbound::persistence::{
    DbPool, DieselApplicationRepository, DieselUserRepository,
};
use darpan_backend::outbound::security::Argon2PasswordHasher;

/// Build the handler state over the database pool and an Argon2id hasher.
pub(super) fn build_http_state(
    pool: &DbPool,
    hasher: Argon2PasswordHasher,
) -> web::Data<HttpState> {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let applications = Arc::new(DieselApplicationRepository::new(pool.clone()));
    let hasher = Arc::new(hasher);

    web::Data::new(HttpState::new(
        Arc::new(RegistrationService::new(users.clone(), hasher.clone())),
        Arc::new(PasswordLoginService::new(users, hasher)),
        Arc::new(ApplicationsService::new(applications)),
    ))
}
