//! Response types and the public error taxonomy.

use std::fmt;

use devcal_core::{Calendar, EventRecord};
use serde::{Deserialize, Serialize};

/// Error codes surfaced to callers. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The host application does not declare calendar permissions.
    PermissionsNotDeclared,
    PermissionDenied,
    InvalidArguments,
    NotFound,
    ReadOnly,
    NotSupported,
    OperationFailed,
    CalendarUnavailable,
    /// The store replied with something inconsistent.
    UnknownError,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 9] = [
        Self::PermissionsNotDeclared,
        Self::PermissionDenied,
        Self::InvalidArguments,
        Self::NotFound,
        Self::ReadOnly,
        Self::NotSupported,
        Self::OperationFailed,
        Self::CalendarUnavailable,
        Self::UnknownError,
    ];

    /// The wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionsNotDeclared => "PERMISSIONS_NOT_DECLARED",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::InvalidArguments => "INVALID_ARGUMENTS",
            Self::NotFound => "NOT_FOUND",
            Self::ReadOnly => "READ_ONLY",
            Self::NotSupported => "NOT_SUPPORTED",
            Self::OperationFailed => "OPERATION_FAILED",
            Self::CalendarUnavailable => "CALENDAR_UNAVAILABLE",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::PermissionsNotDeclared => "Calendar permissions are not declared by the app",
            Self::PermissionDenied => "Calendar access was denied",
            Self::InvalidArguments => "The arguments are invalid",
            Self::NotFound => "The calendar or event does not exist",
            Self::ReadOnly => "The calendar cannot be modified",
            Self::NotSupported => "The operation is not supported on this platform",
            Self::OperationFailed => "The calendar store rejected the operation",
            Self::CalendarUnavailable => "The calendar store is unavailable",
            Self::UnknownError => "An unknown error occurred",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error response details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArguments, message)
    }

    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotSupported, message)
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ErrorResponse {}

/// Calendar permission state, with the numeric codes the host reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionStatus {
    Granted,
    /// Events can be written but not read.
    WriteOnly,
    Denied,
    /// Access is blocked by policy (e.g. parental controls).
    Restricted,
    NotDetermined,
}

impl PermissionStatus {
    pub fn code(&self) -> u8 {
        match self {
            Self::Granted => 0,
            Self::WriteOnly => 1,
            Self::Denied => 2,
            Self::Restricted => 3,
            Self::NotDetermined => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Granted),
            1 => Some(Self::WriteOnly),
            2 => Some(Self::Denied),
            3 => Some(Self::Restricted),
            4 => Some(Self::NotDetermined),
            _ => None,
        }
    }

    pub fn can_read(&self) -> bool {
        matches!(self, Self::Granted)
    }

    pub fn can_write(&self) -> bool {
        matches!(self, Self::Granted | Self::WriteOnly)
    }
}

/// Result of a method call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MethodResponse {
    Calendars {
        calendars: Vec<Calendar>,
    },

    CalendarId {
        calendar_id: String,
    },

    Events {
        events: Vec<EventRecord>,
    },

    /// `event` is absent when the instance id matches nothing.
    Event {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        event: Option<EventRecord>,
    },

    EventId {
        event_id: String,
    },

    PermissionStatus {
        status: PermissionStatus,
    },

    Ok,

    Error {
        #[serde(flatten)]
        error: ErrorResponse,
    },
}

impl MethodResponse {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error {
            error: ErrorResponse::new(code, message),
        }
    }

    pub fn from_error(error: ErrorResponse) -> Self {
        Self::Error { error }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Error { .. })
    }

    pub fn as_error(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Error { error } => Some(error),
            _ => None,
        }
    }
}
