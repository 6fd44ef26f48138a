//! Rows as a native calendar store reports them, and the field sets written
//! back to it.
//!
//! All timestamps are raw: all-day boundaries use the backend's
//! [`FloatingEncoding`](devcal_core::FloatingEncoding) and end convention.

use devcal_core::{Availability, EventStatus};
use serde::{Deserialize, Serialize};

/// One event or one occurrence of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEventRow {
    pub event_id: String,
    pub calendar_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Occurrence start.
    pub start: i64,
    /// Occurrence end; some stores leave it unset.
    pub end: Option<i64>,
    pub all_day: bool,
    pub availability: Option<String>,
    pub status: Option<String>,
    pub time_zone: Option<String>,
    pub recurrence_rule: Option<String>,
}

impl RawEventRow {
    pub fn new(event_id: impl Into<String>, calendar_id: impl Into<String>, start: i64) -> Self {
        Self {
            event_id: event_id.into(),
            calendar_id: calendar_id.into(),
            title: None,
            description: None,
            location: None,
            start,
            end: None,
            all_day: false,
            availability: None,
            status: None,
            time_zone: None,
            recurrence_rule: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_end(mut self, end: i64) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    pub fn with_time_zone(mut self, tz: impl Into<String>) -> Self {
        self.time_zone = Some(tz.into());
        self
    }

    pub fn with_recurrence_rule(mut self, rule: impl Into<String>) -> Self {
        self.recurrence_rule = Some(rule.into());
        self
    }

    pub fn with_availability(mut self, availability: impl Into<String>) -> Self {
        self.availability = Some(availability.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// True when the row belongs to a recurring series.
    pub fn is_recurring(&self) -> bool {
        self.recurrence_rule
            .as_deref()
            .is_some_and(|rule| !rule.trim().is_empty())
    }
}

/// A calendar row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCalendar {
    pub id: String,
    pub name: String,
    /// ARGB or RGB integer.
    pub color: Option<u32>,
    /// Set when the access level is below contributor.
    pub read_only: bool,
    pub is_primary: bool,
    pub visible: bool,
    pub account_name: Option<String>,
    pub account_type: Option<String>,
}

impl RawCalendar {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: None,
            read_only: false,
            is_primary: false,
            visible: true,
            account_name: None,
            account_type: None,
        }
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_primary(mut self, is_primary: bool) -> Self {
        self.is_primary = is_primary;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_account(mut self, name: impl Into<String>, kind: impl Into<String>) -> Self {
        self.account_name = Some(name.into());
        self.account_type = Some(kind.into());
        self
    }
}

/// Fields written by a create or update. `None` leaves a field untouched.
///
/// Times are raw; for all-day events the end is exclusive and the store
/// applies its own end convention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub all_day: Option<bool>,
    pub time_zone: Option<String>,
    pub availability: Option<Availability>,
    pub status: Option<EventStatus>,
}

impl EventFields {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A calendar to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCalendar {
    pub name: String,
    /// RGB value.
    pub color: Option<u32>,
}

/// Changes to an existing calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarPatch {
    pub name: Option<String>,
    /// RGB value.
    pub color: Option<u32>,
}

impl CalendarPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recurrence_requires_non_empty_rule() {
        let row = RawEventRow::new("1", "c", 0);
        assert!(!row.is_recurring());
        assert!(!row.clone().with_recurrence_rule("  ").is_recurring());
        assert!(row.with_recurrence_rule("FREQ=DAILY").is_recurring());
    }

    #[test]
    fn empty_field_sets() {
        assert!(EventFields::default().is_empty());
        assert!(
            !EventFields {
                all_day: Some(false),
                ..Default::default()
            }
            .is_empty()
        );
        assert!(CalendarPatch::default().is_empty());
    }

    #[test]
    fn calendar_defaults_visible_and_writable() {
        let calendar = RawCalendar::new("1", "Home");
        assert!(calendar.visible);
        assert!(!calendar.read_only);
    }
}
