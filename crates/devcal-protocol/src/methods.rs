//! Method calls and their arguments.
//!
//! On the wire a call is `{"method": "<name>", "arguments": {...}}` with
//! camelCase argument names. Methods without arguments omit `arguments`.

use devcal_core::Availability;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProtocolError, ProtocolResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCalendarArgs {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_hex: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCalendarArgs {
    pub calendar_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_hex: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCalendarArgs {
    pub calendar_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveEventsArgs {
    pub start_date: i64,
    pub end_date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEventArgs {
    pub instance_id: String,
}

/// For all-day events `start_date` and `end_date` are floating: local
/// midnight of the first day and of the first excluded day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventArgs {
    pub calendar_id: String,
    pub title: String,
    pub start_date: i64,
    pub end_date: i64,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEventArgs {
    pub instance_id: String,
    pub affect_all_instances: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventArgs {
    pub instance_id: String,
    pub affect_all_instances: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_all_day: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
}

impl UpdateEventArgs {
    pub fn new(instance_id: impl Into<String>, affect_all_instances: bool) -> Self {
        Self {
            instance_id: instance_id.into(),
            affect_all_instances,
            ..Self::default()
        }
    }

    /// True when at least one field would change.
    pub fn has_changes(&self) -> bool {
        self.title.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
            || self.description.is_some()
            || self.location.is_some()
            || self.is_all_day.is_some()
            || self.time_zone.is_some()
            || self.availability.is_some()
    }
}

/// A call from the application layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "arguments", rename_all = "camelCase")]
pub enum MethodCall {
    ListCalendars,
    CreateCalendar(CreateCalendarArgs),
    UpdateCalendar(UpdateCalendarArgs),
    DeleteCalendar(DeleteCalendarArgs),
    RetrieveEvents(RetrieveEventsArgs),
    GetEvent(GetEventArgs),
    CreateEvent(CreateEventArgs),
    DeleteEvent(DeleteEventArgs),
    UpdateEvent(UpdateEventArgs),
    RequestPermissions,
    HasPermissions,
}

impl MethodCall {
    /// Every method name, as it appears on the wire.
    pub const METHODS: [&'static str; 11] = [
        "listCalendars",
        "createCalendar",
        "updateCalendar",
        "deleteCalendar",
        "retrieveEvents",
        "getEvent",
        "createEvent",
        "deleteEvent",
        "updateEvent",
        "requestPermissions",
        "hasPermissions",
    ];

    pub fn method_name(&self) -> &'static str {
        match self {
            Self::ListCalendars => "listCalendars",
            Self::CreateCalendar(_) => "createCalendar",
            Self::UpdateCalendar(_) => "updateCalendar",
            Self::DeleteCalendar(_) => "deleteCalendar",
            Self::RetrieveEvents(_) => "retrieveEvents",
            Self::GetEvent(_) => "getEvent",
            Self::CreateEvent(_) => "createEvent",
            Self::DeleteEvent(_) => "deleteEvent",
            Self::UpdateEvent(_) => "updateEvent",
            Self::RequestPermissions => "requestPermissions",
            Self::HasPermissions => "hasPermissions",
        }
    }

    /// Builds a call from a method name and its raw arguments.
    ///
    /// Unknown names give [`ProtocolError::UnknownMethod`]; arguments that do
    /// not fit the method give [`ProtocolError::InvalidArguments`].
    pub fn from_parts(method: &str, arguments: Value) -> ProtocolResult<Self> {
        fn args<T: serde::de::DeserializeOwned>(method: &str, value: Value) -> ProtocolResult<T> {
            serde_json::from_value(value).map_err(|source| ProtocolError::InvalidArguments {
                method: method.to_string(),
                source,
            })
        }

        Ok(match method {
            "listCalendars" => Self::ListCalendars,
            "requestPermissions" => Self::RequestPermissions,
            "hasPermissions" => Self::HasPermissions,
            "createCalendar" => Self::CreateCalendar(args(method, arguments)?),
            "updateCalendar" => Self::UpdateCalendar(args(method, arguments)?),
            "deleteCalendar" => Self::DeleteCalendar(args(method, arguments)?),
            "retrieveEvents" => Self::RetrieveEvents(args(method, arguments)?),
            "getEvent" => Self::GetEvent(args(method, arguments)?),
            "createEvent" => Self::CreateEvent(args(method, arguments)?),
            "deleteEvent" => Self::DeleteEvent(args(method, arguments)?),
            "updateEvent" => Self::UpdateEvent(args(method, arguments)?),
            other => return Err(ProtocolError::UnknownMethod(other.to_string())),
        })
    }
}
