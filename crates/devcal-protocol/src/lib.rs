//! Method calls, responses and error codes exchanged with the application
//! layer.
//!
//! Calls are named methods with camelCase JSON arguments. Every call
//! produces exactly one [`MethodResponse`]: a success payload or an
//! [`ErrorResponse`] carrying one of the [`ErrorCode`]s.
//!
//! # Example
//!
//! ```rust
//! use devcal_protocol::{MethodCall, decode_call_line};
//!
//! let line = decode_call_line(r#"{"method":"hasPermissions"}"#).unwrap();
//! assert_eq!(line.to_call().unwrap(), MethodCall::HasPermissions);
//! ```

mod error;
mod lines;
mod methods;
mod types;

pub use error::{ProtocolError, ProtocolResult};
pub use lines::{CallLine, ResponseLine, decode_call_line, encode_response_line};
pub use methods::{
    CreateCalendarArgs, CreateEventArgs, DeleteCalendarArgs, DeleteEventArgs, GetEventArgs,
    MethodCall, RetrieveEventsArgs, UpdateCalendarArgs, UpdateEventArgs,
};
pub use types::{ErrorCode, ErrorResponse, MethodResponse, PermissionStatus};

/// Maximum length of one JSON line (1 MB).
pub const MAX_LINE_LENGTH: usize = 1024 * 1024;
