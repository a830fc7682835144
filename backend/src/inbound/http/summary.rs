//! Executive-summary handler.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{Error, generate_summary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::validation::invalid_field_type;

/// Request body for `POST /api/generate-summary`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SummaryRequest {
    /// Arbitrary JSON object to summarise.
    #[schema(value_type = Object, example = json!({"income": 52000, "dependants": 2}))]
    pub data: Value,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Summarise client-supplied data. Deterministic; no external call is made.
#[utoipa::path(
    post,
    path = "/api/generate-summary",
    request_body = SummaryRequest,
    responses(
        (status = 200, description = "Summary text", body = SummaryResponse),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["summary"],
    operation_id = "generateSummary",
    security([])
)]
#[post("/generate-summary")]
pub async fn summarise(
    payload: web::Json<SummaryRequest>,
) -> ApiResult<web::Json<SummaryResponse>> {
    let Value::Object(data) = payload.into_inner().data else {
        return Err(invalid_field_type("data", "object"));
    };
    Ok(web::Json(SummaryResponse {
        summary: generate_summary(&data),
    }))
}
