//! The [`CalendarBackend`] trait.
//!
//! A backend adapts one native calendar store. It speaks in raw rows and raw
//! timestamps only; normalization happens in [`crate::mapper`].

use std::future::Future;
use std::pin::Pin;

use crate::error::BackendResult;
use crate::profile::BackendProfile;
use crate::raw::{CalendarPatch, EventFields, NewCalendar, RawCalendar, RawEventRow};

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A range query over occurrences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeQuery {
    /// Start of the range, epoch milliseconds (inclusive).
    pub start: i64,
    /// End of the range, epoch milliseconds (inclusive).
    pub end: i64,
    /// Only these calendars. `None` or an empty list means all.
    pub calendar_ids: Option<Vec<String>>,
    /// Only occurrences of this event.
    pub event_id: Option<String>,
}

impl RangeQuery {
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }

    pub fn with_calendar_ids(mut self, ids: Vec<String>) -> Self {
        self.calendar_ids = Some(ids);
        self
    }

    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    /// Checks the calendar filter.
    pub fn matches_calendar(&self, calendar_id: &str) -> bool {
        match &self.calendar_ids {
            Some(ids) if !ids.is_empty() => ids.iter().any(|id| id == calendar_id),
            _ => true,
        }
    }
}

/// Which part of a series a mutation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationSpan {
    /// Only the occurrence that starts at this raw timestamp.
    ThisOccurrence(i64),
    /// The whole series, or the single event.
    AllOccurrences,
}

/// A write against the event store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventMutation {
    Create {
        calendar_id: String,
        fields: EventFields,
    },
    Update {
        event_id: String,
        fields: EventFields,
        span: MutationSpan,
    },
    Delete {
        event_id: String,
        span: MutationSpan,
    },
}

impl EventMutation {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }
}

/// What a mutation reported back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Id of the created record. Empty when the store returned none.
    Created(String),
    /// Number of rows affected.
    Affected(u64),
}

/// Adapter over one native calendar store.
///
/// Range results come back ordered by raw occurrence start. Zero affected
/// rows is reported as `MutationOutcome::Affected(0)`, not as an error.
pub trait CalendarBackend: Send + Sync {
    /// The conventions this store follows.
    fn profile(&self) -> &BackendProfile;

    /// Occurrences overlapping the query range.
    fn query_by_range(&self, query: RangeQuery) -> BoxFuture<'_, BackendResult<Vec<RawEventRow>>>;

    /// The master row of an event.
    fn query_by_id<'a>(
        &'a self,
        event_id: &'a str,
    ) -> BoxFuture<'a, BackendResult<Option<RawEventRow>>>;

    fn mutate(&self, mutation: EventMutation) -> BoxFuture<'_, BackendResult<MutationOutcome>>;

    fn list_calendars(&self) -> BoxFuture<'_, BackendResult<Vec<RawCalendar>>>;

    /// A single calendar. The default scans [`list_calendars`](Self::list_calendars).
    fn get_calendar<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, BackendResult<Option<RawCalendar>>> {
        Box::pin(async move {
            let calendars = self.list_calendars().await?;
            Ok(calendars.into_iter().find(|calendar| calendar.id == id))
        })
    }

    /// Creates a calendar and returns its id.
    fn create_calendar(&self, calendar: NewCalendar) -> BoxFuture<'_, BackendResult<String>>;

    /// Returns the number of calendars changed.
    fn update_calendar<'a>(
        &'a self,
        id: &'a str,
        patch: CalendarPatch,
    ) -> BoxFuture<'a, BackendResult<u64>>;

    /// Returns the number of calendars removed.
    fn delete_calendar<'a>(&'a self, id: &'a str) -> BoxFuture<'a, BackendResult<u64>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_query_builder() {
        let query = RangeQuery::new(0, 10)
            .with_calendar_ids(vec!["a".to_string()])
            .with_event_id("E");
        assert_eq!(query.event_id.as_deref(), Some("E"));
        assert!(query.matches_calendar("a"));
        assert!(!query.matches_calendar("b"));
    }

    #[test]
    fn empty_calendar_filter_matches_all() {
        let query = RangeQuery::new(0, 10).with_calendar_ids(vec![]);
        assert!(query.matches_calendar("anything"));
        assert!(RangeQuery::new(0, 10).matches_calendar("anything"));
    }

    #[test]
    fn mutation_kind() {
        let delete = EventMutation::Delete {
            event_id: "1".to_string(),
            span: MutationSpan::AllOccurrences,
        };
        assert_eq!(delete.kind(), "delete");
    }
}
