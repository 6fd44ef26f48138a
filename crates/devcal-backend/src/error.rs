//! Error types for calendar backend operations.
//!
//! Backends report failures with a [`BackendErrorCode`]. The bridge maps each
//! code onto the public error taxonomy; raw backend errors never reach callers.

use std::fmt;
use thiserror::Error;

/// The category of a backend error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendErrorCode {
    /// The calendar, event or occurrence does not exist.
    NotFound,
    /// The OS refused access to the calendar store.
    Security,
    /// The target calendar or source does not allow modifications.
    ReadOnly,
    /// The calendar store cannot be reached right now.
    Unavailable,
    /// The store rejected the request parameters (including span caps).
    InvalidInput,
    /// The store cannot perform this kind of operation.
    Unsupported,
    /// The store reported a generic failure.
    Failed,
    /// The store replied with something that contradicts the request,
    /// e.g. a successful insert without an id.
    InvalidReply,
}

impl BackendErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Security => "security",
            Self::ReadOnly => "read_only",
            Self::Unavailable => "unavailable",
            Self::InvalidInput => "invalid_input",
            Self::Unsupported => "unsupported",
            Self::Failed => "failed",
            Self::InvalidReply => "invalid_reply",
        }
    }
}

impl fmt::Display for BackendErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error reported by a calendar backend.
#[derive(Debug, Error)]
pub struct BackendError {
    code: BackendErrorCode,
    message: String,
    /// Name of the backend profile that produced the error.
    backend: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl BackendError {
    pub fn new(code: BackendErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            backend: None,
            source: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::NotFound, message)
    }

    pub fn security(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::Security, message)
    }

    pub fn read_only(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::ReadOnly, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::Unavailable, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::InvalidInput, message)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::Unsupported, message)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::Failed, message)
    }

    pub fn invalid_reply(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::InvalidReply, message)
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> BackendErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn backend(&self) -> Option<&str> {
        self.backend.as_deref()
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl From<devcal_core::TimeError> for BackendError {
    fn from(err: devcal_core::TimeError) -> Self {
        Self::invalid_input(err.to_string()).with_source(err)
    }
}

pub type BackendResult<T> = Result<T, BackendError>;
