//! In-memory calendar store.
//!
//! Stores raw rows exactly as a native store following the configured
//! [`BackendProfile`] would: all-day ends are written in the profile's end
//! convention and recurring series are kept as a master row plus one
//! materialized row per occurrence.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use crate::backend::{
    BoxFuture, CalendarBackend, EventMutation, MutationOutcome, MutationSpan, RangeQuery,
};
use crate::error::{BackendError, BackendErrorCode, BackendResult};
use crate::profile::BackendProfile;
use crate::raw::{CalendarPatch, EventFields, NewCalendar, RawCalendar, RawEventRow};
use devcal_core::AllDayEnd;

/// Gap between an inclusive all-day end and the next day's midnight.
const END_OF_DAY_OFFSET_MS: i64 = 1000;

#[derive(Debug, Clone)]
struct StoredEvent {
    master: RawEventRow,
    occurrences: Vec<RawEventRow>,
}

#[derive(Debug, Default)]
struct MemoryState {
    calendars: Vec<RawCalendar>,
    events: Vec<StoredEvent>,
    next_id: u64,
    failure: Option<(BackendErrorCode, String)>,
}

impl MemoryState {
    fn next_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let id = self.next_id.to_string();
            let taken = self.calendars.iter().any(|c| c.id == id)
                || self.events.iter().any(|e| e.master.event_id == id);
            if !taken {
                return id;
            }
        }
    }

    fn calendar(&self, id: &str) -> Option<&RawCalendar> {
        self.calendars.iter().find(|c| c.id == id)
    }

    fn writable_calendar(&self, id: &str) -> BackendResult<&RawCalendar> {
        let calendar = self
            .calendar(id)
            .ok_or_else(|| BackendError::not_found(format!("calendar {id} not found")))?;
        if calendar.read_only {
            return Err(BackendError::read_only(format!(
                "calendar {id} is read-only"
            )));
        }
        Ok(calendar)
    }

    fn event_index(&self, event_id: &str) -> Option<usize> {
        self.events
            .iter()
            .position(|e| e.master.event_id == event_id)
    }
}

/// A [`CalendarBackend`] kept entirely in memory.
#[derive(Debug)]
pub struct MemoryBackend {
    profile: BackendProfile,
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    pub fn new(profile: BackendProfile) -> Self {
        Self {
            profile,
            state: Mutex::new(MemoryState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a calendar row as-is.
    pub fn seed_calendar(&self, calendar: RawCalendar) {
        self.state().calendars.push(calendar);
    }

    /// Adds a single event; `row` is stored as-is.
    pub fn seed_event(&self, row: RawEventRow) {
        self.state().events.push(StoredEvent {
            master: row.clone(),
            occurrences: vec![row],
        });
    }

    /// Adds a recurring series with one occurrence per raw start. Each
    /// occurrence keeps the master's duration.
    pub fn seed_series(&self, master: RawEventRow, starts: &[i64]) {
        let duration = master.end.map(|end| end - master.start);
        let occurrences = starts
            .iter()
            .map(|&start| RawEventRow {
                start,
                end: duration.map(|d| start + d),
                ..master.clone()
            })
            .collect();
        self.state().events.push(StoredEvent {
            master,
            occurrences,
        });
    }

    /// Makes every following call fail with the code and message of `error`.
    pub fn fail_with(&self, error: BackendError) {
        self.state().failure = Some((error.code(), error.message().to_string()));
    }

    pub fn clear_failure(&self) {
        self.state().failure = None;
    }

    /// The stored master row of an event.
    pub fn raw_event(&self, event_id: &str) -> Option<RawEventRow> {
        let state = self.state();
        state
            .event_index(event_id)
            .map(|idx| state.events[idx].master.clone())
    }

    /// The stored occurrence rows of an event.
    pub fn raw_occurrences(&self, event_id: &str) -> Vec<RawEventRow> {
        let state = self.state();
        state
            .event_index(event_id)
            .map(|idx| state.events[idx].occurrences.clone())
            .unwrap_or_default()
    }

    pub fn event_count(&self) -> usize {
        self.state().events.len()
    }

    fn tag(&self, error: BackendError) -> BackendError {
        error.with_backend(&self.profile.name)
    }

    fn check_failure(&self, state: &MemoryState) -> BackendResult<()> {
        match &state.failure {
            Some((code, message)) => Err(self.tag(BackendError::new(*code, message.clone()))),
            None => Ok(()),
        }
    }

    /// Converts an exclusive end to the end this store writes.
    fn stored_end(&self, all_day: bool, end: i64) -> i64 {
        if all_day && self.profile.all_day_end == AllDayEnd::InclusiveEndOfDay {
            end - END_OF_DAY_OFFSET_MS
        } else {
            end
        }
    }

    fn range(&self, query: &RangeQuery) -> BackendResult<Vec<RawEventRow>> {
        let state = self.state();
        self.check_failure(&state)?;

        if query.end < query.start {
            return Err(self.tag(BackendError::invalid_input(format!(
                "range end {} is before start {}",
                query.end, query.start
            ))));
        }
        let span = query.end.saturating_sub(query.start);
        if self.profile.max_query_span_millis().is_some_and(|max| span > max) {
            return Err(self.tag(BackendError::invalid_input(format!(
                "query span exceeds {} days",
                self.profile.max_query_span_days.unwrap_or_default()
            ))));
        }

        let mut rows: Vec<RawEventRow> = state
            .events
            .iter()
            .filter(|e| query.matches_calendar(&e.master.calendar_id))
            .filter(|e| {
                query
                    .event_id
                    .as_deref()
                    .is_none_or(|id| id == e.master.event_id)
            })
            .flat_map(|e| e.occurrences.iter())
            .filter(|row| row.start <= query.end && row.end.unwrap_or(row.start) >= query.start)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.start);
        trace!(rows = rows.len(), "range query");
        Ok(rows)
    }

    fn apply(&self, mutation: EventMutation) -> BackendResult<MutationOutcome> {
        let mut state = self.state();
        self.check_failure(&state)?;
        debug!(kind = mutation.kind(), "applying mutation");

        match mutation {
            EventMutation::Create {
                calendar_id,
                fields,
            } => {
                state
                    .writable_calendar(&calendar_id)
                    .map_err(|e| self.tag(e))?;
                let row = self.new_row(state.next_id(), calendar_id, &fields)?;
                let id = row.event_id.clone();
                state.events.push(StoredEvent {
                    master: row.clone(),
                    occurrences: vec![row],
                });
                Ok(MutationOutcome::Created(id))
            }
            EventMutation::Update {
                event_id,
                fields,
                span,
            } => {
                let Some(idx) = state.event_index(&event_id) else {
                    return Ok(MutationOutcome::Affected(0));
                };
                let calendar_id = state.events[idx].master.calendar_id.clone();
                state
                    .writable_calendar(&calendar_id)
                    .map_err(|e| self.tag(e))?;
                let event = &mut state.events[idx];
                match span {
                    MutationSpan::ThisOccurrence(raw_start) => {
                        self.require_single_instance()?;
                        let Some(row) = event.occurrences.iter_mut().find(|r| r.start == raw_start)
                        else {
                            return Ok(MutationOutcome::Affected(0));
                        };
                        apply_details(row, &fields);
                        if let Some(start) = fields.start {
                            row.start = start;
                        }
                        if let Some(end) = fields.end {
                            row.end = Some(self.stored_end(row.all_day, end));
                        }
                        Ok(MutationOutcome::Affected(1))
                    }
                    MutationSpan::AllOccurrences => {
                        self.update_series(event, &fields);
                        Ok(MutationOutcome::Affected(1))
                    }
                }
            }
            EventMutation::Delete { event_id, span } => {
                let Some(idx) = state.event_index(&event_id) else {
                    return Ok(MutationOutcome::Affected(0));
                };
                let calendar_id = state.events[idx].master.calendar_id.clone();
                state
                    .writable_calendar(&calendar_id)
                    .map_err(|e| self.tag(e))?;
                match span {
                    MutationSpan::ThisOccurrence(raw_start) => {
                        self.require_single_instance()?;
                        let occurrences = &mut state.events[idx].occurrences;
                        let before = occurrences.len();
                        occurrences.retain(|r| r.start != raw_start);
                        Ok(MutationOutcome::Affected((before - occurrences.len()) as u64))
                    }
                    MutationSpan::AllOccurrences => {
                        state.events.remove(idx);
                        Ok(MutationOutcome::Affected(1))
                    }
                }
            }
        }
    }

    fn require_single_instance(&self) -> BackendResult<()> {
        if self.profile.supports_single_instance_mutation {
            Ok(())
        } else {
            Err(self.tag(BackendError::unsupported(
                "single-occurrence changes are not supported",
            )))
        }
    }

    fn new_row(
        &self,
        event_id: String,
        calendar_id: String,
        fields: &EventFields,
    ) -> BackendResult<RawEventRow> {
        let (Some(start), Some(end)) = (fields.start, fields.end) else {
            return Err(self.tag(BackendError::invalid_input(
                "start and end are required",
            )));
        };
        let mut row = RawEventRow::new(event_id, calendar_id, start);
        apply_details(&mut row, fields);
        row.end = Some(self.stored_end(row.all_day, end));
        Ok(row)
    }

    /// Applies `fields` to the master and shifts every occurrence by the
    /// change of the master start.
    fn update_series(&self, event: &mut StoredEvent, fields: &EventFields) {
        let master = &mut event.master;
        let old_start = master.start;
        apply_details(master, fields);
        if let Some(start) = fields.start {
            master.start = start;
        }
        if let Some(end) = fields.end {
            master.end = Some(self.stored_end(master.all_day, end));
        }
        let shift = master.start - old_start;
        let duration = master.end.map(|end| end - master.start);
        let times_changed = fields.start.is_some() || fields.end.is_some();

        for row in &mut event.occurrences {
            apply_details(row, fields);
            if times_changed {
                row.start += shift;
                row.end = duration.map(|d| row.start + d);
            }
        }
        // a single event's only occurrence mirrors the master
        if !master.is_recurring() {
            event.occurrences = vec![master.clone()];
        }
    }

    fn calendars(&self) -> BackendResult<Vec<RawCalendar>> {
        let state = self.state();
        self.check_failure(&state)?;
        Ok(state.calendars.clone())
    }

    fn insert_calendar(&self, calendar: NewCalendar) -> BackendResult<String> {
        let mut state = self.state();
        self.check_failure(&state)?;
        if calendar.name.trim().is_empty() {
            return Err(self.tag(BackendError::invalid_input("calendar name is empty")));
        }
        let id = state.next_id();
        let mut raw = RawCalendar::new(&id, calendar.name).with_account("local", "LOCAL");
        raw.color = calendar.color.map(|rgb| 0xFF00_0000 | rgb);
        state.calendars.push(raw);
        Ok(id)
    }

    fn patch_calendar(&self, id: &str, patch: CalendarPatch) -> BackendResult<u64> {
        let mut state = self.state();
        self.check_failure(&state)?;
        if state.calendar(id).is_none() {
            return Ok(0);
        }
        state.writable_calendar(id).map_err(|e| self.tag(e))?;
        let Some(calendar) = state.calendars.iter_mut().find(|c| c.id == id) else {
            return Ok(0);
        };
        if let Some(name) = patch.name {
            calendar.name = name;
        }
        if let Some(rgb) = patch.color {
            calendar.color = Some(0xFF00_0000 | rgb);
        }
        Ok(1)
    }

    fn remove_calendar(&self, id: &str) -> BackendResult<u64> {
        let mut state = self.state();
        self.check_failure(&state)?;
        if state.calendar(id).is_none() {
            return Ok(0);
        }
        state.writable_calendar(id).map_err(|e| self.tag(e))?;
        state.calendars.retain(|c| c.id != id);
        state.events.retain(|e| e.master.calendar_id != id);
        Ok(1)
    }
}

/// Copies every non-time field present in `fields` onto `row`.
fn apply_details(row: &mut RawEventRow, fields: &EventFields) {
    if let Some(title) = &fields.title {
        row.title = Some(title.clone());
    }
    if let Some(description) = &fields.description {
        row.description = Some(description.clone());
    }
    if let Some(location) = &fields.location {
        row.location = Some(location.clone());
    }
    if let Some(all_day) = fields.all_day {
        row.all_day = all_day;
    }
    if let Some(tz) = &fields.time_zone {
        row.time_zone = Some(tz.clone());
    } else if fields.all_day == Some(true) {
        row.time_zone = None;
    }
    if let Some(availability) = fields.availability {
        row.availability = Some(availability.as_str().to_string());
    }
    if let Some(status) = fields.status {
        row.status = Some(status.as_str().to_string());
    }
}

impl CalendarBackend for MemoryBackend {
    fn profile(&self) -> &BackendProfile {
        &self.profile
    }

    fn query_by_range(&self, query: RangeQuery) -> BoxFuture<'_, BackendResult<Vec<RawEventRow>>> {
        let result = self.range(&query);
        Box::pin(async move { result })
    }

    fn query_by_id<'a>(
        &'a self,
        event_id: &'a str,
    ) -> BoxFuture<'a, BackendResult<Option<RawEventRow>>> {
        let result = {
            let state = self.state();
            self.check_failure(&state).map(|()| {
                state
                    .event_index(event_id)
                    .map(|idx| state.events[idx].master.clone())
            })
        };
        Box::pin(async move { result })
    }

    fn mutate(&self, mutation: EventMutation) -> BoxFuture<'_, BackendResult<MutationOutcome>> {
        let result = self.apply(mutation);
        Box::pin(async move { result })
    }

    fn list_calendars(&self) -> BoxFuture<'_, BackendResult<Vec<RawCalendar>>> {
        let result = self.calendars();
        Box::pin(async move { result })
    }

    fn create_calendar(&self, calendar: NewCalendar) -> BoxFuture<'_, BackendResult<String>> {
        let result = self.insert_calendar(calendar);
        Box::pin(async move { result })
    }

    fn update_calendar<'a>(
        &'a self,
        id: &'a str,
        patch: CalendarPatch,
    ) -> BoxFuture<'a, BackendResult<u64>> {
        let result = self.patch_calendar(id, patch);
        Box::pin(async move { result })
    }

    fn delete_calendar<'a>(&'a self, id: &'a str) -> BoxFuture<'a, BackendResult<u64>> {
        let result = self.remove_calendar(id);
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devcal_core::{Availability, MILLIS_PER_DAY};

    const HOUR: i64 = 3_600_000;

    fn backend(profile: BackendProfile) -> MemoryBackend {
        let backend = MemoryBackend::new(profile);
        backend.seed_calendar(RawCalendar::new("cal", "Home"));
        backend.seed_calendar(RawCalendar::new("ro", "Holidays").with_read_only(true));
        backend.seed_event(RawEventRow::new("single", "cal", 5 * HOUR).with_end(6 * HOUR));
        backend.seed_series(
            RawEventRow::new("daily", "cal", HOUR)
                .with_end(2 * HOUR)
                .with_recurrence_rule("FREQ=DAILY;COUNT=3"),
            &[HOUR, HOUR + MILLIS_PER_DAY, HOUR + 2 * MILLIS_PER_DAY],
        );
        backend.seed_event(RawEventRow::new("fixed", "ro", 3 * HOUR).with_end(4 * HOUR));
        backend
    }

    fn timed(start: i64, end: i64) -> EventFields {
        EventFields {
            title: Some("New".to_string()),
            start: Some(start),
            end: Some(end),
            all_day: Some(false),
            ..Default::default()
        }
    }

    mod queries {
        use super::*;

        #[tokio::test]
        async fn range_is_sorted_and_filtered() {
            let backend = backend(BackendProfile::content_provider());
            let rows = backend
                .query_by_range(RangeQuery::new(0, MILLIS_PER_DAY))
                .await
                .unwrap();
            let ids: Vec<_> = rows.iter().map(|r| (r.event_id.as_str(), r.start)).collect();
            assert_eq!(
                ids,
                [("daily", HOUR), ("fixed", 3 * HOUR), ("single", 5 * HOUR)]
            );

            let only_ro = backend
                .query_by_range(RangeQuery::new(0, MILLIS_PER_DAY).with_calendar_ids(vec!["ro".into()]))
                .await
                .unwrap();
            assert_eq!(only_ro.len(), 1);
        }

        #[tokio::test]
        async fn event_filter_limits_to_one_series() {
            let backend = backend(BackendProfile::content_provider());
            let rows = backend
                .query_by_range(RangeQuery::new(0, 3 * MILLIS_PER_DAY).with_event_id("daily"))
                .await
                .unwrap();
            assert_eq!(rows.len(), 3);
            assert!(rows.iter().all(|r| r.event_id == "daily"));
        }

        #[tokio::test]
        async fn span_cap_is_invalid_input() {
            let backend = backend(BackendProfile::event_store());
            let err = backend
                .query_by_range(RangeQuery::new(0, 1500 * MILLIS_PER_DAY))
                .await
                .unwrap_err();
            assert_eq!(err.code(), BackendErrorCode::InvalidInput);
            assert_eq!(err.backend(), Some("event_store"));
        }

        #[tokio::test]
        async fn get_calendar_scans_list() {
            let backend = backend(BackendProfile::content_provider());
            let calendar = backend.get_calendar("ro").await.unwrap().unwrap();
            assert!(calendar.read_only);
            assert!(backend.get_calendar("nope").await.unwrap().is_none());
        }

        #[tokio::test]
        async fn injected_failure_applies_until_cleared() {
            let backend = backend(BackendProfile::content_provider());
            backend.fail_with(BackendError::security("revoked"));
            let err = backend.list_calendars().await.unwrap_err();
            assert_eq!(err.code(), BackendErrorCode::Security);
            assert_eq!(err.message(), "revoked");
            backend.clear_failure();
            assert_eq!(backend.list_calendars().await.unwrap().len(), 2);
        }
    }

    mod mutations {
        use super::*;

        #[tokio::test]
        async fn create_assigns_id_and_stores_fields() {
            let backend = backend(BackendProfile::content_provider());
            let mut fields = timed(10 * HOUR, 11 * HOUR);
            fields.availability = Some(Availability::Free);
            let outcome = backend
                .mutate(EventMutation::Create {
                    calendar_id: "cal".into(),
                    fields,
                })
                .await
                .unwrap();
            let MutationOutcome::Created(id) = outcome else {
                panic!("expected created");
            };
            let row = backend.raw_event(&id).unwrap();
            assert_eq!(row.title.as_deref(), Some("New"));
            assert_eq!(row.end, Some(11 * HOUR));
            assert_eq!(row.availability.as_deref(), Some("free"));
        }

        #[tokio::test]
        async fn create_in_read_only_or_missing_calendar() {
            let backend = backend(BackendProfile::content_provider());
            let err = backend
                .mutate(EventMutation::Create {
                    calendar_id: "ro".into(),
                    fields: timed(0, HOUR),
                })
                .await
                .unwrap_err();
            assert_eq!(err.code(), BackendErrorCode::ReadOnly);

            let err = backend
                .mutate(EventMutation::Create {
                    calendar_id: "gone".into(),
                    fields: timed(0, HOUR),
                })
                .await
                .unwrap_err();
            assert_eq!(err.code(), BackendErrorCode::NotFound);
        }

        #[tokio::test]
        async fn inclusive_store_writes_end_of_day() {
            let backend = backend(BackendProfile::event_store());
            let outcome = backend
                .mutate(EventMutation::Create {
                    calendar_id: "cal".into(),
                    fields: EventFields {
                        start: Some(0),
                        end: Some(MILLIS_PER_DAY),
                        all_day: Some(true),
                        ..Default::default()
                    },
                })
                .await
                .unwrap();
            let MutationOutcome::Created(id) = outcome else {
                panic!("expected created");
            };
            assert_eq!(backend.raw_event(&id).unwrap().end, Some(MILLIS_PER_DAY - 1000));
        }

        #[tokio::test]
        async fn delete_missing_event_affects_nothing() {
            let backend = backend(BackendProfile::content_provider());
            let outcome = backend
                .mutate(EventMutation::Delete {
                    event_id: "nope".into(),
                    span: MutationSpan::AllOccurrences,
                })
                .await
                .unwrap();
            assert_eq!(outcome, MutationOutcome::Affected(0));
        }

        #[tokio::test]
        async fn single_occurrence_delete_needs_support() {
            let backend = backend(BackendProfile::content_provider());
            let err = backend
                .mutate(EventMutation::Delete {
                    event_id: "daily".into(),
                    span: MutationSpan::ThisOccurrence(HOUR + MILLIS_PER_DAY),
                })
                .await
                .unwrap_err();
            assert_eq!(err.code(), BackendErrorCode::Unsupported);
            assert_eq!(backend.raw_occurrences("daily").len(), 3);
        }

        #[tokio::test]
        async fn single_occurrence_delete_removes_one() {
            let backend = backend(BackendProfile::event_store());
            let outcome = backend
                .mutate(EventMutation::Delete {
                    event_id: "daily".into(),
                    span: MutationSpan::ThisOccurrence(HOUR + MILLIS_PER_DAY),
                })
                .await
                .unwrap();
            assert_eq!(outcome, MutationOutcome::Affected(1));
            let starts: Vec<_> = backend
                .raw_occurrences("daily")
                .iter()
                .map(|r| r.start)
                .collect();
            assert_eq!(starts, [HOUR, HOUR + 2 * MILLIS_PER_DAY]);
        }

        #[tokio::test]
        async fn single_occurrence_update_leaves_others() {
            let backend = backend(BackendProfile::event_store());
            backend
                .mutate(EventMutation::Update {
                    event_id: "daily".into(),
                    fields: EventFields {
                        title: Some("Moved".into()),
                        start: Some(HOUR + MILLIS_PER_DAY + HOUR),
                        end: Some(HOUR + MILLIS_PER_DAY + 2 * HOUR),
                        ..Default::default()
                    },
                    span: MutationSpan::ThisOccurrence(HOUR + MILLIS_PER_DAY),
                })
                .await
                .unwrap();
            let rows = backend.raw_occurrences("daily");
            assert_eq!(rows[0].title, None);
            assert_eq!(rows[1].title.as_deref(), Some("Moved"));
            assert_eq!(rows[1].start, 2 * HOUR + MILLIS_PER_DAY);
            assert_eq!(rows[2].start, HOUR + 2 * MILLIS_PER_DAY);
        }

        #[tokio::test]
        async fn series_update_shifts_every_occurrence() {
            let backend = backend(BackendProfile::content_provider());
            backend
                .mutate(EventMutation::Update {
                    event_id: "daily".into(),
                    fields: EventFields {
                        start: Some(2 * HOUR),
                        end: Some(4 * HOUR),
                        ..Default::default()
                    },
                    span: MutationSpan::AllOccurrences,
                })
                .await
                .unwrap();
            let rows = backend.raw_occurrences("daily");
            let times: Vec<_> = rows.iter().map(|r| (r.start, r.end.unwrap())).collect();
            assert_eq!(
                times,
                [
                    (2 * HOUR, 4 * HOUR),
                    (2 * HOUR + MILLIS_PER_DAY, 4 * HOUR + MILLIS_PER_DAY),
                    (2 * HOUR + 2 * MILLIS_PER_DAY, 4 * HOUR + 2 * MILLIS_PER_DAY),
                ]
            );
        }

        #[tokio::test]
        async fn update_in_read_only_calendar() {
            let backend = backend(BackendProfile::content_provider());
            let err = backend
                .mutate(EventMutation::Update {
                    event_id: "fixed".into(),
                    fields: timed(0, HOUR),
                    span: MutationSpan::AllOccurrences,
                })
                .await
                .unwrap_err();
            assert_eq!(err.code(), BackendErrorCode::ReadOnly);
        }
    }

    mod calendars {
        use super::*;

        #[tokio::test]
        async fn create_update_delete() {
            let backend = backend(BackendProfile::content_provider());
            let id = backend
                .create_calendar(NewCalendar {
                    name: "Trips".into(),
                    color: Some(0x112233),
                })
                .await
                .unwrap();
            let created = backend.get_calendar(&id).await.unwrap().unwrap();
            assert_eq!(created.color, Some(0xFF11_2233));
            assert_eq!(created.account_type.as_deref(), Some("LOCAL"));

            let changed = backend
                .update_calendar(
                    &id,
                    CalendarPatch {
                        name: Some("Travel".into()),
                        color: None,
                    },
                )
                .await
                .unwrap();
            assert_eq!(changed, 1);
            assert_eq!(backend.get_calendar(&id).await.unwrap().unwrap().name, "Travel");

            assert_eq!(backend.delete_calendar(&id).await.unwrap(), 1);
            assert_eq!(backend.delete_calendar(&id).await.unwrap(), 0);
        }

        #[tokio::test]
        async fn deleting_calendar_drops_its_events() {
            let backend = backend(BackendProfile::content_provider());
            assert_eq!(backend.delete_calendar("cal").await.unwrap(), 1);
            assert_eq!(backend.event_count(), 1);
        }

        #[tokio::test]
        async fn read_only_calendar_cannot_change() {
            let backend = backend(BackendProfile::content_provider());
            let err = backend.delete_calendar("ro").await.unwrap_err();
            assert_eq!(err.code(), BackendErrorCode::ReadOnly);
        }

        #[tokio::test]
        async fn empty_name_is_rejected() {
            let backend = backend(BackendProfile::content_provider());
            let err = backend
                .create_calendar(NewCalendar {
                    name: " ".into(),
                    color: None,
                })
                .await
                .unwrap_err();
            assert_eq!(err.code(), BackendErrorCode::InvalidInput);
        }
    }
}
