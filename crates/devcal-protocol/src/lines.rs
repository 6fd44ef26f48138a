//! Newline-delimited JSON framing.
//!
//! Each call occupies one line:
//!
//! ```text
//! {"id":1,"method":"getEvent","arguments":{"instanceId":"42@1700000000000"}}
//! ```
//!
//! and each response echoes the id next to the flattened [`MethodResponse`]:
//!
//! ```text
//! {"id":1,"type":"event","event":{...}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::MAX_LINE_LENGTH;
use crate::error::{ProtocolError, ProtocolResult};
use crate::methods::MethodCall;
use crate::types::MethodResponse;

/// A call as read from one input line, before its arguments are checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub arguments: Value,
}

impl CallLine {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: None,
            method: method.into(),
            arguments,
        }
    }

    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Checks the method name and arguments.
    pub fn to_call(&self) -> ProtocolResult<MethodCall> {
        MethodCall::from_parts(&self.method, self.arguments.clone())
    }
}

/// A response line; `id` echoes the call's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub response: MethodResponse,
}

impl ResponseLine {
    pub fn new(id: Option<Value>, response: MethodResponse) -> Self {
        Self { id, response }
    }
}

/// Decodes one input line. Surrounding whitespace is ignored.
pub fn decode_call_line(line: &str) -> ProtocolResult<CallLine> {
    if line.len() > MAX_LINE_LENGTH {
        return Err(ProtocolError::LineTooLong {
            size: line.len(),
            max: MAX_LINE_LENGTH,
        });
    }

    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ProtocolError::EmptyLine);
    }

    Ok(serde_json::from_str(trimmed)?)
}

/// Encodes a response as a single line, without the trailing newline.
pub fn encode_response_line(line: &ResponseLine) -> ProtocolResult<String> {
    let json = serde_json::to_string(line)?;
    if json.len() > MAX_LINE_LENGTH {
        return Err(ProtocolError::LineTooLong {
            size: json.len(),
            max: MAX_LINE_LENGTH,
        });
    }
    Ok(json)
}
