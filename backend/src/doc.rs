//! OpenAPI documentation for the portal API.
//!
//! [`ApiDoc`] collects every HTTP endpoint from the inbound layer together
//! with the request, response and domain schemas they reference, plus the
//! session cookie security scheme. Swagger UI serves it in debug builds and
//! the `openapi-dump` binary prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{ApplicationSummary, Error, ErrorCode, Role, User};
use crate::inbound::http::applications::ApplicationsResponse;
use crate::inbound::http::health::WelcomeResponse;
use crate::inbound::http::summary::{SummaryRequest, SummaryResponse};
use crate::inbound::http::users::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Project Darpan backend API",
        description = "Citizen accounts, application tracking and data summaries."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::applications::list_applications,
        crate::inbound::http::summary::summarise,
        crate::inbound::http::health::root,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Role,
        ApplicationSummary,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        ApplicationsResponse,
        SummaryRequest,
        SummaryResponse,
        WelcomeResponse,
    )),
    tags(
        (name = "users", description = "Registration and login"),
        (name = "applications", description = "Service application tracking"),
        (name = "summary", description = "Executive summaries of client data"),
        (name = "health", description = "Greeting and health probes")
    )
)]
pub struct ApiDoc;
