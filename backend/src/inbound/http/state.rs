//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the driving
//! ports, so they can be tested without a database.

use std::sync::Arc;

use crate::domain::ports::{ApplicationsQuery, LoginService, UserRegistration};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn UserRegistration>,
    pub login: Arc<dyn LoginService>,
    pub applications: Arc<dyn ApplicationsQuery>,
}

impl HttpState {
    pub fn new(
        registration: Arc<dyn UserRegistration>,
        login: Arc<dyn LoginService>,
        applications: Arc<dyn ApplicationsQuery>,
    ) -> Self {
        Self {
            registration,
            login,
            applications,
        }
    }
}
