//! Raw row to canonical record conversion.
//!
//! [`map_event_row`] is the only path from a [`RawEventRow`] to an
//! [`EventRecord`]. Range queries and single-event lookups both go through it,
//! so the same occurrence always maps to the same record.

use chrono_tz::Tz;
use devcal_core::{
    AccountType, Availability, Calendar, ColorHex, EventRecord, EventStatus, encode_instance_id,
    raw_end_to_local_floating, raw_to_local_floating,
};
use tracing::debug;

use crate::error::BackendResult;
use crate::profile::BackendProfile;
use crate::raw::{RawCalendar, RawEventRow};

/// Converts one raw row into an [`EventRecord`].
///
/// All-day boundaries become local midnight in `tz` with an exclusive end.
/// A missing end is replaced by the start and an end before the start is
/// clamped to it.
pub fn map_event_row(
    row: &RawEventRow,
    profile: &BackendProfile,
    tz: &Tz,
) -> BackendResult<EventRecord> {
    let is_recurring = row.is_recurring();
    let raw_end = row.end.unwrap_or(row.start);

    let (start, end) = if row.all_day {
        (
            raw_to_local_floating(row.start, profile.floating_encoding, tz)?,
            raw_end_to_local_floating(raw_end, profile.floating_encoding, profile.all_day_end, tz)?,
        )
    } else {
        (row.start, raw_end)
    };

    if end < start {
        debug!(event_id = %row.event_id, start, end, "clamping end before start");
    }

    let time_zone = if row.all_day {
        None
    } else {
        row.time_zone.clone().filter(|tz| !tz.trim().is_empty())
    };

    Ok(EventRecord {
        event_id: row.event_id.clone(),
        instance_id: encode_instance_id(&row.event_id, is_recurring, row.start),
        calendar_id: row.calendar_id.clone(),
        title: row.title.clone().unwrap_or_default(),
        start_date: start,
        end_date: end.max(start),
        is_all_day: row.all_day,
        availability: Availability::from_raw(row.availability.as_deref()),
        status: EventStatus::from_raw(row.status.as_deref()),
        time_zone,
        is_recurring,
        description: row.description.clone(),
        location: row.location.clone(),
    })
}

/// Maps a slice of rows, preserving order.
pub fn map_event_rows(
    rows: &[RawEventRow],
    profile: &BackendProfile,
    tz: &Tz,
) -> BackendResult<Vec<EventRecord>> {
    rows.iter()
        .map(|row| map_event_row(row, profile, tz))
        .collect()
}

/// Converts a calendar row into a [`Calendar`].
pub fn map_calendar_row(raw: &RawCalendar) -> Calendar {
    Calendar {
        id: raw.id.clone(),
        name: raw.name.clone(),
        color_hex: raw.color.map(|argb| ColorHex::from_argb(argb).to_string()),
        read_only: raw.read_only,
        is_primary: raw.is_primary,
        hidden: !raw.visible,
        account_name: raw.account_name.clone(),
        account_type: raw.account_type.as_deref().map(AccountType::from_raw),
    }
}
