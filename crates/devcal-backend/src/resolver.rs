//! Lookup of a single event or occurrence by instance id.

use chrono_tz::Tz;
use devcal_core::{EventRecord, InstanceId, TimeRange};
use tracing::{debug, instrument};

use crate::backend::{CalendarBackend, RangeQuery};
use crate::error::BackendResult;
use crate::mapper::map_event_row;
use crate::raw::RawEventRow;

/// Half-width of the window searched around an occurrence start.
pub const OCCURRENCE_WINDOW_MS: i64 = 1000;

/// Resolves an instance id to the raw row it addresses.
///
/// A bare event id returns the master row. An occurrence id searches
/// `[t - W, t + W]` for rows of the same event and picks the one whose raw
/// start is closest to `t`; ties go to the first row in result order.
#[instrument(level = "debug", skip_all, fields(instance_id = %id))]
pub async fn resolve_row(
    id: &InstanceId,
    backend: &dyn CalendarBackend,
) -> BackendResult<Option<RawEventRow>> {
    let Some(target) = id.occurrence else {
        return backend.query_by_id(&id.event_id).await;
    };

    let window = TimeRange::around(target, OCCURRENCE_WINDOW_MS);
    let rows = backend
        .query_by_range(RangeQuery::new(window.start, window.end).with_event_id(&id.event_id))
        .await?;
    debug!(candidates = rows.len(), "occurrence window queried");

    Ok(closest_occurrence(rows, &id.event_id, target))
}

/// Resolves an instance id to a mapped [`EventRecord`].
pub async fn resolve(
    id: &InstanceId,
    backend: &dyn CalendarBackend,
    tz: &Tz,
) -> BackendResult<Option<EventRecord>> {
    match resolve_row(id, backend).await? {
        Some(row) => Ok(Some(map_event_row(&row, backend.profile(), tz)?)),
        None => Ok(None),
    }
}

fn closest_occurrence(rows: Vec<RawEventRow>, event_id: &str, target: i64) -> Option<RawEventRow> {
    let mut best: Option<(i64, RawEventRow)> = None;
    for row in rows {
        if row.event_id != event_id {
            continue;
        }
        let distance = row.start.abs_diff(target);
        if distance > OCCURRENCE_WINDOW_MS.unsigned_abs() {
            continue;
        }
        let distance = i64::try_from(distance).unwrap_or(i64::MAX);
        // strict comparison keeps the earliest row on ties
        if best.as_ref().is_none_or(|(d, _)| distance < *d) {
            best = Some((distance, row));
        }
    }
    best.map(|(_, row)| row)
}
