//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 1005,
        "error": "INTERNAL_ERROR",
        "message": "An internal server error occurred"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid object identifier",
    content_type = "application/json",
    example = json!({
        "code": 1002,
        "error": "INVALID_OBJECT_ID",
        "message": "invalid object id \"not-a-hex-id\""
    })
)]
pub struct BadRequestObjectIdResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "code": 1004,
        "error": "NOT_FOUND",
        "message": "Resource not found"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Service Unavailable",
    content_type = "application/json",
    example = json!({
        "code": 1011,
        "error": "SERVICE_UNAVAILABLE",
        "message": "Service is temporarily unavailable"
    })
)]
pub struct ServiceUnavailableResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Gateway Timeout",
    content_type = "application/json",
    example = json!({
        "code": 1012,
        "error": "TIMEOUT",
        "message": "The operation timed out"
    })
)]
pub struct GatewayTimeoutResponse(pub ErrorResponse);
