//! Instance identifiers.
//!
//! A non-recurring event is addressed by its event id alone. An occurrence of
//! a recurring series is addressed as `eventId@rawStartMillis`, where the
//! suffix is the occurrence start exactly as the backend stored it (before
//! any floating-date normalization).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Separator between the event id and the occurrence start.
pub const OCCURRENCE_SEPARATOR: char = '@';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceIdError {
    #[error("invalid instance id '{0}': occurrence suffix is not an integer")]
    InvalidInstanceId(String),
}

/// A decoded instance id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceId {
    pub event_id: String,
    /// Raw occurrence start, present for recurring occurrences.
    pub occurrence: Option<i64>,
}

impl InstanceId {
    pub fn series(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            occurrence: None,
        }
    }

    pub fn occurrence(event_id: impl Into<String>, raw_start: i64) -> Self {
        Self {
            event_id: event_id.into(),
            occurrence: Some(raw_start),
        }
    }

    pub fn is_occurrence(&self) -> bool {
        self.occurrence.is_some()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.occurrence {
            Some(raw) => write!(f, "{}{OCCURRENCE_SEPARATOR}{raw}", self.event_id),
            None => f.write_str(&self.event_id),
        }
    }
}

impl FromStr for InstanceId {
    type Err = InstanceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((event_id, suffix)) = s.split_once(OCCURRENCE_SEPARATOR) else {
            return Ok(Self::series(s));
        };
        // i64::from_str accepts a leading '+', the wire form never carries one
        if suffix.starts_with('+') {
            return Err(InstanceIdError::InvalidInstanceId(s.to_string()));
        }
        let raw = suffix
            .parse::<i64>()
            .map_err(|_| InstanceIdError::InvalidInstanceId(s.to_string()))?;
        Ok(Self::occurrence(event_id, raw))
    }
}

impl Serialize for InstanceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for InstanceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Builds the wire form of an instance id.
pub fn encode_instance_id(event_id: &str, is_recurring: bool, raw_start: i64) -> String {
    if is_recurring {
        InstanceId::occurrence(event_id, raw_start).to_string()
    } else {
        event_id.to_string()
    }
}

/// Parses the wire form of an instance id.
pub fn decode_instance_id(instance_id: &str) -> Result<InstanceId, InstanceIdError> {
    instance_id.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_recurring_is_bare_event_id() {
        assert_eq!(encode_instance_id("42", false, 1_700_000_000_000), "42");
    }

    #[test]
    fn recurring_embeds_raw_start() {
        assert_eq!(
            encode_instance_id("42", true, 1_700_000_000_000),
            "42@1700000000000"
        );
        assert_eq!(encode_instance_id("E", true, -5), "E@-5");
    }

    #[test]
    fn decode_inverts_encode() {
        for (id, t) in [("42", 0), ("E", 1000), ("abc-DEF_9", -86_400_000), ("x", i64::MAX)] {
            let decoded = decode_instance_id(&encode_instance_id(id, true, t)).unwrap();
            assert_eq!(decoded, InstanceId::occurrence(id, t));
        }
    }

    #[test]
    fn decode_without_separator() {
        let decoded = decode_instance_id("E").unwrap();
        assert_eq!(decoded.event_id, "E");
        assert!(!decoded.is_occurrence());
    }

    #[test]
    fn splits_on_first_separator() {
        // event ids never contain '@', so a second one makes the suffix invalid
        assert!(decode_instance_id("a@b@1000").is_err());
        assert_eq!(
            decode_instance_id("a@1000").unwrap(),
            InstanceId::occurrence("a", 1000)
        );
    }

    #[test]
    fn rejects_non_numeric_suffix() {
        for bad in ["E@", "E@abc", "E@12x", "E@+12", "E@1.5", "E@99999999999999999999"] {
            assert_eq!(
                decode_instance_id(bad),
                Err(InstanceIdError::InvalidInstanceId(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn serde_uses_wire_form() {
        let id = InstanceId::occurrence("E", 5000);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"E@5000\"");
        let back: InstanceId = serde_json::from_str("\"E@5000\"").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<InstanceId>("\"E@x\"").is_err());
    }
}
