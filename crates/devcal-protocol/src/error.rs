//! Protocol error types.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors raised while decoding or encoding method calls.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The line is not valid JSON or lacks a method name.
    #[error("malformed call: {0}")]
    Malformed(#[from] serde_json::Error),

    /// No method with this name exists.
    #[error("method '{0}' is not implemented")]
    UnknownMethod(String),

    /// The arguments do not match the method's signature.
    #[error("invalid arguments for {method}: {source}")]
    InvalidArguments {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    /// The input line is larger than [`MAX_LINE_LENGTH`](crate::MAX_LINE_LENGTH).
    #[error("line too long: {size} bytes (max: {max})")]
    LineTooLong { size: usize, max: usize },

    #[error("empty line")]
    EmptyLine,
}
