//! Facade error type.
//!
//! Every facade failure carries exactly one [`ErrorCode`]. Backend errors are
//! translated here and never reach callers in their raw form.

use devcal_backend::{BackendError, BackendErrorCode};
use devcal_protocol::{ErrorCode, ErrorResponse};
use thiserror::Error;
use tracing::warn;

/// Result type for facade operations.
pub type CalendarResult<T> = Result<T, CalendarError>;

/// Guidance attached to rejected single-occurrence changes.
pub const SINGLE_OCCURRENCE_GUIDANCE: &str = "Changing a single occurrence of a recurring event \
     is not supported by this calendar store. Pass affectAllInstances = true to change the whole \
     series.";

/// Guidance returned when the host application lacks calendar permissions.
pub const PERMISSIONS_NOT_DECLARED_GUIDANCE: &str = "Calendar permissions must be declared in \
     AndroidManifest.xml.\n\nAdd the following to android/app/src/main/AndroidManifest.xml:\n\
     <uses-permission android:name=\"android.permission.READ_CALENDAR\"/>\n\
     <uses-permission android:name=\"android.permission.WRITE_CALENDAR\"/>";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct CalendarError {
    code: ErrorCode,
    message: String,
}

impl CalendarError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArguments, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn read_only(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ReadOnly, message)
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    pub fn permissions_not_declared() -> Self {
        Self::new(
            ErrorCode::PermissionsNotDeclared,
            PERMISSIONS_NOT_DECLARED_GUIDANCE,
        )
    }

    pub fn single_occurrence_unsupported() -> Self {
        Self::new(ErrorCode::NotSupported, SINGLE_OCCURRENCE_GUIDANCE)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnknownError, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<BackendError> for CalendarError {
    fn from(err: BackendError) -> Self {
        let code = match err.code() {
            BackendErrorCode::NotFound => ErrorCode::NotFound,
            BackendErrorCode::Security => ErrorCode::PermissionDenied,
            BackendErrorCode::ReadOnly => ErrorCode::ReadOnly,
            BackendErrorCode::Unavailable => ErrorCode::CalendarUnavailable,
            BackendErrorCode::InvalidInput => ErrorCode::InvalidArguments,
            BackendErrorCode::Unsupported => ErrorCode::NotSupported,
            BackendErrorCode::Failed => ErrorCode::OperationFailed,
            BackendErrorCode::InvalidReply => ErrorCode::UnknownError,
        };
        Self::new(code, err.message())
    }
}

impl From<CalendarError> for ErrorResponse {
    fn from(err: CalendarError) -> Self {
        ErrorResponse::new(err.code, err.message)
    }
}

/// Logs a backend failure and translates it.
pub(crate) fn backend_failure(operation: &'static str) -> impl FnOnce(BackendError) -> CalendarError {
    move |err| {
        warn!(operation, error = %err, "backend operation failed");
        CalendarError::from(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_codes_map_onto_the_taxonomy() {
        let cases = [
            (BackendError::not_found("x"), ErrorCode::NotFound),
            (BackendError::security("x"), ErrorCode::PermissionDenied),
            (BackendError::read_only("x"), ErrorCode::ReadOnly),
            (BackendError::unavailable("x"), ErrorCode::CalendarUnavailable),
            (BackendError::invalid_input("x"), ErrorCode::InvalidArguments),
            (BackendError::unsupported("x"), ErrorCode::NotSupported),
            (BackendError::failed("x"), ErrorCode::OperationFailed),
            (BackendError::invalid_reply("x"), ErrorCode::UnknownError),
        ];
        for (backend, expected) in cases {
            assert_eq!(CalendarError::from(backend).code(), expected);
        }
    }

    #[test]
    fn keeps_backend_message_without_backend_tag() {
        let err = CalendarError::from(
            BackendError::failed("insert rejected").with_backend("content_provider"),
        );
        assert_eq!(err.message(), "insert rejected");
        assert_eq!(err.to_string(), "OPERATION_FAILED: insert rejected");
    }

    #[test]
    fn guidance_texts() {
        let err = CalendarError::single_occurrence_unsupported();
        assert_eq!(err.code(), ErrorCode::NotSupported);
        assert!(err.message().contains("affectAllInstances = true"));

        let err = CalendarError::permissions_not_declared();
        assert!(err.message().contains("android.permission.READ_CALENDAR"));
        assert!(err.message().contains("android.permission.WRITE_CALENDAR"));
    }

    #[test]
    fn converts_to_error_response() {
        let response: ErrorResponse = CalendarError::read_only("calendar 2 is read-only").into();
        assert_eq!(response.code, ErrorCode::ReadOnly);
        assert_eq!(response.message, "calendar 2 is read-only");
    }
}
