use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use std::error::Error as StdError;
use strum::{Display, IntoStaticStr};
use thiserror::Error;

use crate::context::Interrupted;
use crate::object_id::InvalidIdentifier;
use crate::store::StoreError;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure category callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    InvalidIdentifier,
    NotFound,
    EncodingFailed,
    DecodeFailed,
    ReadFailed,
    WriteFailed,
    StoreUnavailable,
    Canceled,
    DeadlineExceeded,
}

/// Repository operation an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    Create,
    FindOne,
    FindAll,
    Update,
    Delete,
}

/// Error returned by every [`crate::UserRepository`] operation.
#[derive(Debug, Error)]
#[error("{operation}: {kind}{}", .id.as_deref().map(|id| format!(" (id {id})")).unwrap_or_default())]
pub struct UserError {
    kind: ErrorKind,
    operation: Operation,
    id: Option<String>,
    #[source]
    source: Option<BoxError>,
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    pub fn new(kind: ErrorKind, operation: Operation) -> Self {
        Self {
            kind,
            operation,
            id: None,
            source: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn not_found(operation: Operation, id: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, operation).with_id(id)
    }

    pub fn invalid_identifier(operation: Operation, err: InvalidIdentifier) -> Self {
        Self::new(ErrorKind::InvalidIdentifier, operation)
            .with_id(err.input.clone())
            .with_source(err)
    }

    pub(crate) fn interrupted(operation: Operation, reason: Interrupted) -> Self {
        let kind = match reason {
            Interrupted::Canceled => ErrorKind::Canceled,
            Interrupted::DeadlineExceeded => ErrorKind::DeadlineExceeded,
        };
        Self::new(kind, operation)
    }

    /// Classify a store failure as `fallback` (`ReadFailed`/`WriteFailed`).
    ///
    /// Only Create reports an unreachable store as `StoreUnavailable`.
    pub(crate) fn store(operation: Operation, fallback: ErrorKind, err: StoreError) -> Self {
        let kind = match (&err, operation) {
            (StoreError::Unavailable(_), Operation::Create) => ErrorKind::StoreUnavailable,
            _ => fallback,
        };
        Self::new(kind, operation).with_source(err)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Whether repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::ReadFailed | ErrorKind::WriteFailed | ErrorKind::StoreUnavailable
        )
    }

    fn describe(&self) -> String {
        match &self.source {
            Some(source) => format!("{self}: {source}"),
            None => self.to_string(),
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err.kind {
            ErrorKind::InvalidIdentifier => AppError::InvalidObjectId(format!(
                "invalid user id {:?}",
                err.id.as_deref().unwrap_or_default()
            )),
            ErrorKind::NotFound => AppError::NotFound(format!(
                "User {} not found",
                err.id.as_deref().unwrap_or_default()
            )),
            ErrorKind::EncodingFailed => AppError::Encoding(err.describe()),
            ErrorKind::DecodeFailed => AppError::Decoding(err.describe()),
            ErrorKind::ReadFailed
            | ErrorKind::WriteFailed
            | ErrorKind::StoreUnavailable
            | ErrorKind::Canceled => AppError::ServiceUnavailable(err.describe()),
            ErrorKind::DeadlineExceeded => AppError::Timeout(err.describe()),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_display_includes_operation_kind_and_id() {
        let err = UserError::not_found(Operation::FindOne, "65f1c0ffee0000000000beef");
        assert_eq!(
            err.to_string(),
            "find_one: not_found (id 65f1c0ffee0000000000beef)"
        );

        let err = UserError::new(ErrorKind::ReadFailed, Operation::FindAll);
        assert_eq!(err.to_string(), "find_all: read_failed");
    }

    #[test]
    fn test_source_is_exposed() {
        let err = UserError::new(ErrorKind::WriteFailed, Operation::Create)
            .with_source("connection reset");
        assert_eq!(err.source().unwrap().to_string(), "connection reset");
    }

    #[test]
    fn test_is_retryable() {
        let retryable = [
            ErrorKind::ReadFailed,
            ErrorKind::WriteFailed,
            ErrorKind::StoreUnavailable,
        ];
        for kind in retryable {
            assert!(UserError::new(kind, Operation::Update).is_retryable());
        }

        let permanent = [
            ErrorKind::InvalidIdentifier,
            ErrorKind::NotFound,
            ErrorKind::EncodingFailed,
            ErrorKind::DecodeFailed,
            ErrorKind::Canceled,
            ErrorKind::DeadlineExceeded,
        ];
        for kind in permanent {
            assert!(!UserError::new(kind, Operation::Update).is_retryable());
        }
    }

    #[test]
    fn test_store_classification() {
        let err = UserError::store(
            Operation::Create,
            ErrorKind::WriteFailed,
            StoreError::Unavailable("no primary".into()),
        );
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);

        let err = UserError::store(
            Operation::Delete,
            ErrorKind::WriteFailed,
            StoreError::Unavailable("no primary".into()),
        );
        assert_eq!(err.kind(), ErrorKind::WriteFailed);

        let err = UserError::store(
            Operation::FindOne,
            ErrorKind::ReadFailed,
            StoreError::Unavailable("connection reset".into()),
        );
        assert_eq!(err.kind(), ErrorKind::ReadFailed);

        let err = UserError::store(
            Operation::Delete,
            ErrorKind::WriteFailed,
            StoreError::Operation("duplicate key".into()),
        );
        assert_eq!(err.kind(), ErrorKind::WriteFailed);
        assert_eq!(err.operation(), Operation::Delete);
    }

    #[test]
    fn test_app_error_status_mapping() {
        let cases = [
            (ErrorKind::InvalidIdentifier, StatusCode::BAD_REQUEST),
            (ErrorKind::NotFound, StatusCode::NOT_FOUND),
            (ErrorKind::EncodingFailed, StatusCode::INTERNAL_SERVER_ERROR),
            (ErrorKind::DecodeFailed, StatusCode::INTERNAL_SERVER_ERROR),
            (ErrorKind::ReadFailed, StatusCode::SERVICE_UNAVAILABLE),
            (ErrorKind::WriteFailed, StatusCode::SERVICE_UNAVAILABLE),
            (ErrorKind::StoreUnavailable, StatusCode::SERVICE_UNAVAILABLE),
            (ErrorKind::Canceled, StatusCode::SERVICE_UNAVAILABLE),
            (ErrorKind::DeadlineExceeded, StatusCode::GATEWAY_TIMEOUT),
        ];

        for (kind, status) in cases {
            let app: AppError = UserError::new(kind, Operation::FindOne).into();
            assert_eq!(app.status(), status, "{kind}");
        }
    }

    #[test]
    fn test_not_found_message_names_the_user() {
        let app: AppError = UserError::not_found(Operation::Delete, "abc").into();
        assert_eq!(app.to_string(), "Not Found: User abc not found");
    }
}
