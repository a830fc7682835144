//! Application listing handler.
//!
//! ```text
//! GET /api/applications/{user_id}
//! ```

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ApplicationSummary, Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::invalid_user_id;

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationsResponse {
    pub applications: Vec<ApplicationSummary>,
}

/// List a user's applications.
///
/// Citizens may only list their own; officials and admins may list anyone's.
#[utoipa::path(
    get,
    path = "/api/applications/{user_id}",
    params(("user_id" = i64, Path, description = "Owner of the applications")),
    responses(
        (status = 200, description = "Applications, possibly empty", body = ApplicationsResponse),
        (status = 400, description = "Invalid user id", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Another user's applications", body = Error),
        (status = 500, description = "Database failure", body = Error)
    ),
    tags = ["applications"],
    operation_id = "listApplications",
    security(("SessionCookie" = []))
)]
#[get("/applications/{user_id}")]
pub async fn list_applications(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ApplicationsResponse>> {
    let caller = session.require_caller()?;
    let raw = path.into_inner();
    let owner = raw
        .trim()
        .parse::<UserId>()
        .map_err(|_| invalid_user_id(&raw))?;

    let applications = state.applications.list_for_user(&caller, owner).await?;
    Ok(web::Json(ApplicationsResponse { applications }))
}
