//! Event operations.
//!
//! Callers always speak canonical values: all-day boundaries are local
//! midnight with an exclusive end. Conversion to the store's raw encoding
//! follows the backend's [`BackendProfile`](devcal_backend::BackendProfile).

use std::sync::Arc;

use chrono::Days;
use chrono_tz::Tz;
use devcal_backend::{
    AllDayTimeZone, CalendarBackend, EventFields, EventMutation, MutationOutcome, MutationSpan,
    RangeQuery, map_event_rows, resolve,
};
use devcal_core::{
    EventRecord, EventStatus, InstanceId, floating_date, local_floating_to_raw, raw_from_date,
};
use devcal_protocol::{CreateEventArgs, UpdateEventArgs};
use tracing::debug;

use crate::calendars::writable_calendar;
use crate::error::{CalendarError, CalendarResult, backend_failure};
use crate::permissions::{AccessLevel, PermissionHost, check_access};
use crate::validate;

/// Query, create, update and delete events.
pub struct EventOps {
    backend: Arc<dyn CalendarBackend>,
    permissions: Arc<dyn PermissionHost>,
    tz: Tz,
}

impl EventOps {
    /// `tz` is the device timezone: all-day dates are local midnight in it.
    pub fn new(
        backend: Arc<dyn CalendarBackend>,
        permissions: Arc<dyn PermissionHost>,
        tz: Tz,
    ) -> Self {
        Self {
            backend,
            permissions,
            tz,
        }
    }

    pub fn time_zone(&self) -> Tz {
        self.tz
    }

    /// Occurrences overlapping `[start, end]`, ordered by start.
    ///
    /// `calendar_ids` of `None` or an empty list means every calendar. A span
    /// the store refuses is reported as-is.
    pub async fn retrieve_events(
        &self,
        start: i64,
        end: i64,
        calendar_ids: Option<Vec<String>>,
    ) -> CalendarResult<Vec<EventRecord>> {
        validate::range("startDate", start, "endDate", end)?;
        debug!(start, end, calendars = ?calendar_ids, "retrieve_events");
        check_access(self.permissions.as_ref(), AccessLevel::Read)?;

        let mut query = RangeQuery::new(start, end);
        if let Some(ids) = calendar_ids {
            query = query.with_calendar_ids(ids);
        }
        let rows = self
            .backend
            .query_by_range(query)
            .await
            .map_err(backend_failure("retrieve_events"))?;
        map_event_rows(&rows, self.backend.profile(), &self.tz)
            .map_err(backend_failure("retrieve_events"))
    }

    /// The event or occurrence addressed by `instance_id`, if any.
    pub async fn get_event(&self, instance_id: &str) -> CalendarResult<Option<EventRecord>> {
        let id = validate::instance_id(instance_id)?;
        debug!(%id, "get_event");
        check_access(self.permissions.as_ref(), AccessLevel::Read)?;
        self.resolve(&id).await
    }

    /// Creates an event and returns its id. The event is confirmed.
    pub async fn create_event(&self, args: &CreateEventArgs) -> CalendarResult<String> {
        let calendar_id = validate::non_empty("calendarId", &args.calendar_id)?;
        validate::range("startDate", args.start_date, "endDate", args.end_date)?;
        let caller_tz = args
            .time_zone
            .as_deref()
            .map(validate::time_zone)
            .transpose()?;
        debug!(
            calendar_id,
            all_day = args.is_all_day,
            start = args.start_date,
            end = args.end_date,
            "create_event"
        );
        check_access(self.permissions.as_ref(), AccessLevel::Write)?;
        writable_calendar(self.backend.as_ref(), calendar_id).await?;

        let mut fields = EventFields {
            title: Some(args.title.clone()),
            description: args.description.clone(),
            location: args.location.clone(),
            all_day: Some(args.is_all_day),
            availability: Some(args.availability),
            status: Some(EventStatus::Confirmed),
            ..EventFields::default()
        };
        if args.is_all_day {
            let (start, end) = self.all_day_bounds(args.start_date, args.end_date)?;
            fields.start = Some(start);
            fields.end = Some(end);
            fields.time_zone = self.all_day_time_zone();
        } else {
            fields.start = Some(args.start_date);
            fields.end = Some(args.end_date);
            fields.time_zone = Some(caller_tz.unwrap_or(self.tz).name().to_string());
        }

        let outcome = self
            .backend
            .mutate(EventMutation::Create {
                calendar_id: calendar_id.to_string(),
                fields,
            })
            .await
            .map_err(backend_failure("create_event"))?;
        match outcome {
            MutationOutcome::Created(id) if !id.is_empty() => Ok(id),
            other => Err(CalendarError::unknown(format!(
                "the calendar store returned no event id ({other:?})"
            ))),
        }
    }

    /// Deletes one occurrence, or the whole event when
    /// `affect_all_instances` is set or the id has no occurrence.
    pub async fn delete_event(
        &self,
        instance_id: &str,
        affect_all_instances: bool,
    ) -> CalendarResult<()> {
        let id = validate::instance_id(instance_id)?;
        debug!(%id, affect_all_instances, "delete_event");
        check_access(self.permissions.as_ref(), AccessLevel::Write)?;
        let span = self.span(&id, affect_all_instances)?;

        let outcome = self
            .backend
            .mutate(EventMutation::Delete {
                event_id: id.event_id.clone(),
                span,
            })
            .await
            .map_err(backend_failure("delete_event"))?;
        expect_affected(outcome, &id)
    }

    /// Changes the given fields of an event or occurrence.
    ///
    /// The current record is resolved first: `isAllDay` is inherited when not
    /// given, and the merged dates must satisfy `end >= start`. Only the
    /// bounds the caller gave are written, except when the event switches
    /// between all-day and timed, which rewrites both.
    pub async fn update_event(&self, args: &UpdateEventArgs) -> CalendarResult<()> {
        let id = validate::instance_id(&args.instance_id)?;
        if !args.has_changes() {
            return Err(CalendarError::invalid_arguments(
                "at least one field to update is required",
            ));
        }
        if let Some(name) = args.time_zone.as_deref() {
            validate::time_zone(name)?;
        }
        debug!(%id, affect_all_instances = args.affect_all_instances, "update_event");
        check_access(self.permissions.as_ref(), AccessLevel::Write)?;
        let span = self.span(&id, args.affect_all_instances)?;

        let current = self
            .resolve(&id)
            .await?
            .ok_or_else(|| CalendarError::not_found(format!("event {id} not found")))?;
        // series-wide changes apply to the master row, not the addressed occurrence
        let current = match (span, id.occurrence) {
            (MutationSpan::AllOccurrences, Some(_)) => self
                .resolve(&InstanceId::series(id.event_id.clone()))
                .await?
                .ok_or_else(|| CalendarError::not_found(format!("event {id} not found")))?,
            _ => current,
        };

        let all_day = args.is_all_day.unwrap_or(current.is_all_day);
        let start = args.start_date.unwrap_or(current.start_date);
        let end = args.end_date.unwrap_or(current.end_date);
        validate::range("startDate", start, "endDate", end)?;

        let mut fields = EventFields {
            title: args.title.clone(),
            description: args.description.clone(),
            location: args.location.clone(),
            all_day: args.is_all_day,
            availability: args.availability,
            ..EventFields::default()
        };

        if all_day {
            let becomes_all_day = !current.is_all_day;
            if becomes_all_day || args.start_date.is_some() || args.end_date.is_some() {
                let (raw_start, raw_end) = self.all_day_bounds(start, end)?;
                if becomes_all_day {
                    fields.start = Some(raw_start);
                    fields.end = Some(raw_end);
                    fields.time_zone = self.all_day_time_zone();
                } else {
                    fields.start = args.start_date.map(|_| raw_start);
                    fields.end = args.end_date.map(|_| raw_end);
                }
            }
        } else if current.is_all_day {
            // stored floating dates become exact instants at local midnight
            fields.start = Some(start);
            fields.end = Some(end);
            fields.time_zone = Some(match &args.time_zone {
                Some(name) => name.trim().to_string(),
                None => self.tz.name().to_string(),
            });
        } else {
            fields.start = args.start_date;
            fields.end = args.end_date;
            fields.time_zone = args.time_zone.as_ref().map(|name| name.trim().to_string());
        }

        let outcome = self
            .backend
            .mutate(EventMutation::Update {
                event_id: id.event_id.clone(),
                fields,
                span,
            })
            .await
            .map_err(backend_failure("update_event"))?;
        expect_affected(outcome, &id)
    }

    async fn resolve(&self, id: &InstanceId) -> CalendarResult<Option<EventRecord>> {
        resolve(id, self.backend.as_ref(), &self.tz)
            .await
            .map_err(backend_failure("resolve"))
    }

    /// Picks the mutation span. A single occurrence is only addressed when
    /// the store supports it; otherwise the caller must opt into the series.
    fn span(&self, id: &InstanceId, affect_all_instances: bool) -> CalendarResult<MutationSpan> {
        match id.occurrence {
            Some(raw_start) if !affect_all_instances => {
                if self.backend.profile().supports_single_instance_mutation {
                    Ok(MutationSpan::ThisOccurrence(raw_start))
                } else {
                    Err(CalendarError::single_occurrence_unsupported())
                }
            }
            _ => Ok(MutationSpan::AllOccurrences),
        }
    }

    /// Converts canonical all-day bounds to raw store values. The end stays
    /// exclusive and covers at least one day.
    fn all_day_bounds(&self, start: i64, end: i64) -> CalendarResult<(i64, i64)> {
        let encoding = self.backend.profile().floating_encoding;
        let to_raw = |millis| {
            local_floating_to_raw(millis, encoding, &self.tz)
                .map_err(|err| CalendarError::invalid_arguments(err.to_string()))
        };
        let raw_start = to_raw(start)?;
        let mut raw_end = to_raw(end)?;
        if raw_end <= raw_start {
            let first_day = floating_date(raw_start, encoding, &self.tz)
                .map_err(|err| CalendarError::invalid_arguments(err.to_string()))?;
            let next_day = first_day
                .checked_add_days(Days::new(1))
                .ok_or_else(|| CalendarError::invalid_arguments("startDate is out of range"))?;
            raw_end = raw_from_date(next_day, encoding, &self.tz);
        }
        Ok((raw_start, raw_end))
    }

    fn all_day_time_zone(&self) -> Option<String> {
        match self.backend.profile().all_day_time_zone {
            AllDayTimeZone::DeviceDefault => Some(self.tz.name().to_string()),
            AllDayTimeZone::Omit => None,
        }
    }
}

fn expect_affected(outcome: MutationOutcome, id: &InstanceId) -> CalendarResult<()> {
    match outcome {
        MutationOutcome::Affected(0) => {
            Err(CalendarError::not_found(format!("event {id} not found")))
        }
        MutationOutcome::Affected(_) => Ok(()),
        MutationOutcome::Created(created) => Err(CalendarError::unknown(format!(
            "the calendar store created {created} instead of changing {id}"
        ))),
    }
}
