//! Type-safe error codes for API responses.
//!
//! Each error code carries:
//! - String representation for client consumption (e.g., "INVALID_OBJECT_ID")
//! - Integer code for logging and monitoring (e.g., 1002)
//! - Default human-readable message
//!
//! # Example
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::InvalidObjectId;
//! assert_eq!(code.as_str(), "INVALID_OBJECT_ID");
//! assert_eq!(code.code(), 1002);
//! assert_eq!(code.default_message(), "Invalid object identifier");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request is malformed
    BadRequest,

    /// Identifier in path or body is not a 24-character hex ObjectId
    InvalidObjectId,

    /// JSON extraction from request body failed
    JsonExtraction,

    /// Requested resource was not found
    NotFound,

    /// An unexpected internal server error occurred
    InternalError,

    /// Service is temporarily unavailable
    ServiceUnavailable,

    /// The operation did not finish before its deadline
    Timeout,

    // Database errors (2000-2999)
    /// Failed to encode a record for the database
    DatabaseEncode,

    /// Failed to decode a stored record
    DatabaseDecode,

    // I/O errors (4000s)
    /// File system or socket I/O error
    IoError,

    // JSON errors (5000s)
    /// JSON serialization/deserialization error
    SerdeJsonError,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier clients can match on.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidObjectId => "INVALID_OBJECT_ID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::Timeout => "TIMEOUT",
            Self::DatabaseEncode => "DATABASE_ENCODE",
            Self::DatabaseDecode => "DATABASE_DECODE",
            Self::IoError => "IO_ERROR",
            Self::SerdeJsonError => "SERDE_JSON_ERROR",
        }
    }

    /// Integer code for structured logs.
    ///
    /// Ranges:
    /// - 1000-1999: Client and service errors
    /// - 2000-2999: Database errors
    /// - 4000-4999: I/O errors
    /// - 5000-5999: Serialization errors
    pub fn code(&self) -> i32 {
        match self {
            Self::BadRequest => 1001,
            Self::InvalidObjectId => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::ServiceUnavailable => 1011,
            Self::Timeout => 1012,

            Self::DatabaseEncode => 2011,
            Self::DatabaseDecode => 2010,

            Self::IoError => 4001,

            Self::SerdeJsonError => 5001,
        }
    }

    /// Default user-facing message.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad request",
            Self::InvalidObjectId => "Invalid object identifier",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::Timeout => "The operation timed out",
            Self::DatabaseEncode => "Failed to encode database request",
            Self::DatabaseDecode => "Failed to decode database response",
            Self::IoError => "I/O error occurred",
            Self::SerdeJsonError => "JSON serialization error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string_representation() {
        assert_eq!(ErrorCode::InvalidObjectId.as_str(), "INVALID_OBJECT_ID");
        assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
        assert_eq!(ErrorCode::Timeout.to_string(), "TIMEOUT");
    }

    #[test]
    fn test_error_code_integer_codes() {
        assert_eq!(ErrorCode::InvalidObjectId.code(), 1002);
        assert_eq!(ErrorCode::DatabaseDecode.code(), 2010);
        assert_eq!(ErrorCode::SerdeJsonError.code(), 5001);
    }

    #[test]
    fn test_error_code_serialization_matches_as_str() {
        for code in [
            ErrorCode::InvalidObjectId,
            ErrorCode::ServiceUnavailable,
            ErrorCode::DatabaseEncode,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }

    #[test]
    fn test_error_code_deserialization() {
        let code: ErrorCode = serde_json::from_str("\"NOT_FOUND\"").unwrap();
        assert_eq!(code, ErrorCode::NotFound);
    }
}
