//! Account handlers: self-registration and login.
//!
//! ```text
//! POST /api/register {"fullName":"Jane Doe","email":"jane@x.com","password":"pw1"}
//! POST /api/login {"email":"jane@x.com","password":"pw1"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AuthenticatedCaller, Error, LoginCredentials, Registration, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::credentials_error;

const REGISTERED_MESSAGE: &str = "Account created successfully. Please log in.";

/// Registration request body for `POST /api/register`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    #[schema(example = "jane@x.com")]
    pub email: String,
    #[schema(example = "pw1")]
    pub password: String,
}

/// Login request body for `POST /api/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "jane@x.com")]
    pub email: String,
    #[schema(example = "pw1")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    #[schema(example = "Account created successfully. Please log in.")]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub user: User,
}

/// Create a citizen account.
///
/// No session is issued; clients log in afterwards.
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Database or insert failure", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<RegisterResponse>> {
    let RegisterRequest {
        full_name,
        email,
        password,
    } = payload.into_inner();
    let registration =
        Registration::try_from_parts(&full_name, &email, &password).map_err(credentials_error)?;

    state.registration.register(&registration).await?;
    Ok(web::Json(RegisterResponse {
        success: true,
        message: REGISTERED_MESSAGE.to_owned(),
    }))
}

/// Authenticate and establish a session.
///
/// Unknown emails and wrong passwords produce the same `401` body.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (
            status = 200,
            description = "Login success",
            body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))
        ),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Database failure", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(credentials_error)?;

    let user = state.login.authenticate(&credentials).await?;
    session.persist_caller(&AuthenticatedCaller::from(&user))?;
    Ok(web::Json(LoginResponse {
        success: true,
        user,
    }))
}
