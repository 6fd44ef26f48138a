//! Canonical event record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string that names no variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// How an event affects the owner's free/busy time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Availability {
    Free,
    #[default]
    Busy,
    Tentative,
    Unavailable,
    NotSupported,
}

impl Availability {
    /// Lenient parse of a backend string. Unknown or missing values map to
    /// [`Availability::Busy`].
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Busy => "busy",
            Self::Tentative => "tentative",
            Self::Unavailable => "unavailable",
            Self::NotSupported => "notSupported",
        }
    }
}

impl FromStr for Availability {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "free" => Ok(Self::Free),
            "busy" => Ok(Self::Busy),
            "tentative" => Ok(Self::Tentative),
            "unavailable" => Ok(Self::Unavailable),
            "notsupported" => Ok(Self::NotSupported),
            _ => Err(UnknownValue {
                kind: "availability",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confirmation state of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventStatus {
    #[default]
    None,
    Confirmed,
    Tentative,
    #[serde(alias = "cancelled")]
    Canceled,
}

impl EventStatus {
    /// Lenient parse of a backend string, [`EventStatus::None`] when unknown.
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Confirmed => "confirmed",
            Self::Tentative => "tentative",
            Self::Canceled => "canceled",
        }
    }
}

impl FromStr for EventStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "none" => Ok(Self::None),
            "confirmed" => Ok(Self::Confirmed),
            "tentative" => Ok(Self::Tentative),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            _ => Err(UnknownValue {
                kind: "status",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One event, or one occurrence of a recurring series, as seen by callers.
///
/// For all-day events `start_date` and `end_date` are local wall-clock
/// midnight in epoch milliseconds and `end_date` is the first excluded day.
/// Timed events carry exact instants and the IANA zone they were created in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub event_id: String,
    pub instance_id: String,
    pub calendar_id: String,
    pub title: String,
    pub start_date: i64,
    pub end_date: i64,
    pub is_all_day: bool,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl EventRecord {
    pub fn duration_millis(&self) -> i64 {
        self.end_date - self.start_date
    }
}
