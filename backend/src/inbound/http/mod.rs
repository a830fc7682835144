//! HTTP inbound adapter exposing the portal's REST endpoints.

pub mod applications;
pub mod error;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
pub mod summary;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register the `/api` endpoints and their JSON extractor configuration.
///
/// Callers wrap the scope in session middleware and provide
/// `web::Data<HttpState>`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use darpan_backend::inbound::http::api_routes;
///
/// let app = App::new().service(web::scope("/api").configure(api_routes));
/// ```
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .service(users::register)
        .service(users::login)
        .service(applications::list_applications)
        .service(summary::summarise);
}
