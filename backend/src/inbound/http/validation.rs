//! Request validation helpers shared by the HTTP handlers.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, web};
use serde_json::json;
use tracing::debug;

use crate::domain::{CredentialsValidationError, Error};

const EMPTY_CODE: &str = "empty";
const INVALID_ID_CODE: &str = "invalid_id";
const INVALID_JSON_CODE: &str = "invalid_json";

/// JSON extractor configuration turning body errors into `400 invalid_request`.
///
/// Covers malformed JSON, wrong content types and missing or mistyped
/// fields, so handlers only see well-formed request bodies.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "rejected request body");
    Error::invalid_request("Invalid request body")
        .with_details(json!({ "code": INVALID_JSON_CODE, "reason": err.to_string() }))
        .into()
}

/// Map a blank-field validation failure onto a field-scoped `400`.
pub(crate) fn credentials_error(err: CredentialsValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": EMPTY_CODE }))
}

/// `400` for a path segment that is not a valid user id.
pub(crate) fn invalid_user_id(raw: &str) -> Error {
    Error::invalid_request("user id must be a positive integer").with_details(json!({
        "field": "userId",
        "value": raw,
        "code": INVALID_ID_CODE,
    }))
}

/// `400` for a field holding the wrong JSON type.
pub(crate) fn invalid_field_type(field: &str, expected: &str) -> Error {
    Error::invalid_request(format!("{field} must be a JSON {expected}"))
        .with_details(json!({ "field": field, "code": format!("expected_{expected}") }))
}
