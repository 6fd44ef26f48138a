//! Per-backend conventions.
//!
//! Everything that differs between native calendar stores lives here so that
//! the facades never branch on the kind of backend.

use devcal_core::{AllDayEnd, FloatingEncoding, MILLIS_PER_DAY};
use serde::{Deserialize, Serialize};

/// Timezone written alongside all-day events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllDayTimeZone {
    /// Write the device timezone.
    #[default]
    DeviceDefault,
    /// Write no timezone; the store treats the dates as floating.
    Omit,
}

/// Convention set of one calendar backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendProfile {
    pub name: String,
    pub floating_encoding: FloatingEncoding,
    pub all_day_end: AllDayEnd,
    pub all_day_time_zone: AllDayTimeZone,
    /// Whether one occurrence of a series can be deleted or edited alone.
    pub supports_single_instance_mutation: bool,
    /// Maximum span of a range query, in days.
    pub max_query_span_days: Option<u32>,
}

impl Default for BackendProfile {
    fn default() -> Self {
        Self::content_provider()
    }
}

impl BackendProfile {
    /// Content-provider style store: all-day dates at UTC midnight, exclusive
    /// end, device timezone on all-day writes, series-wide edits only.
    pub fn content_provider() -> Self {
        Self {
            name: "content_provider".to_string(),
            floating_encoding: FloatingEncoding::Utc,
            all_day_end: AllDayEnd::Exclusive,
            all_day_time_zone: AllDayTimeZone::DeviceDefault,
            supports_single_instance_mutation: false,
            max_query_span_days: None,
        }
    }

    /// Event-store style store: all-day dates at local midnight, end at the
    /// end of the last day, no timezone on all-day events, per-occurrence
    /// edits, queries capped at four years.
    pub fn event_store() -> Self {
        Self {
            name: "event_store".to_string(),
            floating_encoding: FloatingEncoding::Local,
            all_day_end: AllDayEnd::InclusiveEndOfDay,
            all_day_time_zone: AllDayTimeZone::Omit,
            supports_single_instance_mutation: true,
            max_query_span_days: Some(4 * 365 + 1),
        }
    }

    /// Looks up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "content_provider" | "android" => Some(Self::content_provider()),
            "event_store" | "eventkit" | "ios" => Some(Self::event_store()),
            _ => None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_single_instance_mutation(mut self, supported: bool) -> Self {
        self.supports_single_instance_mutation = supported;
        self
    }

    #[must_use]
    pub fn with_max_query_span_days(mut self, days: Option<u32>) -> Self {
        self.max_query_span_days = days;
        self
    }

    /// Maximum query span in milliseconds, if capped.
    pub fn max_query_span_millis(&self) -> Option<i64> {
        self.max_query_span_days
            .map(|days| i64::from(days) * MILLIS_PER_DAY)
    }
}
