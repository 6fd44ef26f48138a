//! Argument checks shared by the facades. Each failure names the offending
//! argument.

use chrono_tz::Tz;
use devcal_core::{ColorHex, InstanceId, decode_instance_id, parse_time_zone};

use crate::error::{CalendarError, CalendarResult};

pub(crate) fn non_empty<'a>(field: &str, value: &'a str) -> CalendarResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CalendarError::invalid_arguments(format!(
            "{field} must not be empty"
        )));
    }
    Ok(trimmed)
}

pub(crate) fn instance_id(value: &str) -> CalendarResult<InstanceId> {
    let id = decode_instance_id(non_empty("instanceId", value)?)
        .map_err(|err| CalendarError::invalid_arguments(format!("instanceId: {err}")))?;
    if id.event_id.is_empty() {
        return Err(CalendarError::invalid_arguments(
            "instanceId: event id is missing",
        ));
    }
    Ok(id)
}

pub(crate) fn color(value: &str) -> CalendarResult<ColorHex> {
    value
        .parse()
        .map_err(|err| CalendarError::invalid_arguments(format!("colorHex: {err}")))
}

pub(crate) fn time_zone(value: &str) -> CalendarResult<Tz> {
    parse_time_zone(value)
        .map_err(|err| CalendarError::invalid_arguments(format!("timeZone: {err}")))
}

pub(crate) fn range(start_field: &str, start: i64, end_field: &str, end: i64) -> CalendarResult<()> {
    if end < start {
        return Err(CalendarError::invalid_arguments(format!(
            "{end_field} ({end}) is before {start_field} ({start})"
        )));
    }
    Ok(())
}
