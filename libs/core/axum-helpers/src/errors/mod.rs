pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Standard error response structure.
///
/// Every error response carries:
/// - `code`: Integer error code for logging/monitoring (e.g., 1004)
/// - `error`: Machine-readable error identifier (e.g., "NOT_FOUND")
/// - `message`: Human-readable error message
/// - `details`: Optional additional error details
///
/// # JSON Example
///
/// ```json
/// {
///   "code": 1004,
///   "error": "NOT_FOUND",
///   "message": "User 65f1c0ffee0000000000beef not found"
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Decoding error: {0}")]
    Decoding(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Timeout: {0}")]
    Timeout(String),
}

impl AppError {
    /// HTTP status this error renders with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::SerdeJson(_)
            | AppError::Io(_)
            | AppError::Encoding(_)
            | AppError::Decoding(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::JsonExtractorRejection(e) => e.status(),
            AppError::BadRequest(_) | AppError::InvalidObjectId(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Error code reported in the response body.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            AppError::SerdeJson(_) => ErrorCode::SerdeJsonError,
            AppError::Io(_) => ErrorCode::IoError,
            AppError::JsonExtractorRejection(_) => ErrorCode::JsonExtraction,
            AppError::BadRequest(_) => ErrorCode::BadRequest,
            AppError::InvalidObjectId(_) => ErrorCode::InvalidObjectId,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Encoding(_) => ErrorCode::DatabaseEncode,
            AppError::Decoding(_) => ErrorCode::DatabaseDecode,
            AppError::InternalServerError(_) => ErrorCode::InternalError,
            AppError::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
            AppError::Timeout(_) => ErrorCode::Timeout,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.error_code();

        // Server-side failures keep their detail in the logs only.
        let message = match self {
            AppError::SerdeJson(e) => {
                tracing::error!(error_code = code.code(), "JSON parsing error: {:?}", e);
                code.default_message().to_string()
            }
            AppError::Io(e) => {
                tracing::error!(error_code = code.code(), "I/O error: {:?}", e);
                code.default_message().to_string()
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = code.code(), "JSON extraction error: {:?}", e);
                e.body_text()
            }
            AppError::BadRequest(msg) | AppError::InvalidObjectId(msg) => {
                tracing::info!(error_code = code.code(), "Bad request: {}", msg);
                msg
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = code.code(), "Not found: {}", msg);
                msg
            }
            AppError::Encoding(msg) | AppError::Decoding(msg) => {
                tracing::error!(error_code = code.code(), "Data conversion error: {}", msg);
                code.default_message().to_string()
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = code.code(), "Internal server error: {}", msg);
                code.default_message().to_string()
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(error_code = code.code(), "Service unavailable: {}", msg);
                code.default_message().to_string()
            }
            AppError::Timeout(msg) => {
                tracing::warn!(error_code = code.code(), "Timeout: {}", msg);
                code.default_message().to_string()
            }
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}
