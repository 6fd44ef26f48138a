//! Floating dates and time ranges.
//!
//! Native calendar stores disagree on how the date of an all-day event is
//! stored: some anchor it at UTC midnight of the calendar date, others at
//! local midnight of the device timezone. The canonical model always exposes
//! all-day boundaries as local wall-clock midnight in epoch milliseconds.
//!
//! Every conversion in this module goes through calendar-date components
//! ([`NaiveDate`]). Millisecond arithmetic across an offset change would
//! shift the date on DST boundaries and in half-hour zones.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Milliseconds in a 24-hour day.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Errors produced while converting timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// The timestamp cannot be represented as a calendar date.
    #[error("timestamp out of range: {0}")]
    OutOfRange(i64),

    /// The name is not a known IANA timezone identifier.
    #[error("unknown timezone: {0}")]
    UnknownTimeZone(String),

    /// A range whose end precedes its start.
    #[error("range end {end} is before start {start}")]
    InvertedRange { start: i64, end: i64 },
}

/// How a backend stores the date of an all-day event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatingEncoding {
    /// UTC midnight of the calendar date.
    #[default]
    Utc,
    /// Local midnight of the calendar date in the device timezone.
    Local,
}

/// How a backend reports the end of an all-day event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllDayEnd {
    /// The first excluded day (open boundary).
    #[default]
    Exclusive,
    /// The end of the last included day, e.g. 23:59:59.
    InclusiveEndOfDay,
}

fn instant(millis: i64) -> Result<DateTime<Utc>, TimeError> {
    DateTime::from_timestamp_millis(millis).ok_or(TimeError::OutOfRange(millis))
}

/// Returns the calendar date a raw all-day boundary stands for.
pub fn floating_date<Z: TimeZone>(
    raw_millis: i64,
    encoding: FloatingEncoding,
    tz: &Z,
) -> Result<NaiveDate, TimeError> {
    let at = instant(raw_millis)?;
    Ok(match encoding {
        FloatingEncoding::Utc => at.date_naive(),
        FloatingEncoding::Local => at.with_timezone(tz).date_naive(),
    })
}

/// Returns the first instant of `date` in `tz`, in epoch milliseconds.
///
/// When midnight is ambiguous the earlier instant wins. When midnight is
/// skipped by a DST jump the result is the first valid instant after the gap.
pub fn local_midnight<Z: TimeZone>(date: NaiveDate, tz: &Z) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight).earliest() {
        Some(start) => start.timestamp_millis(),
        None => gap_start(midnight, tz).and_utc().timestamp_millis(),
    }
}

/// Converts a local wall-clock time inside a DST gap to the UTC instant at
/// which the gap starts, using the offset in force the day before.
fn gap_start<Z: TimeZone>(local: NaiveDateTime, tz: &Z) -> NaiveDateTime {
    let before = local - TimeDelta::days(1);
    let offset = tz.offset_from_utc_datetime(&before).fix();
    debug!(%local, offset = %offset, "local midnight falls in a DST gap");
    local - TimeDelta::seconds(i64::from(offset.local_minus_utc()))
}

/// Encodes a calendar date the way a backend with `encoding` stores it.
pub fn raw_from_date<Z: TimeZone>(date: NaiveDate, encoding: FloatingEncoding, tz: &Z) -> i64 {
    match encoding {
        FloatingEncoding::Utc => date.and_time(NaiveTime::MIN).and_utc().timestamp_millis(),
        FloatingEncoding::Local => local_midnight(date, tz),
    }
}

/// Converts a raw all-day boundary to canonical local midnight.
pub fn raw_to_local_floating<Z: TimeZone>(
    raw_millis: i64,
    encoding: FloatingEncoding,
    tz: &Z,
) -> Result<i64, TimeError> {
    let date = floating_date(raw_millis, encoding, tz)?;
    Ok(local_midnight(date, tz))
}

/// Converts canonical local midnight back to the backend's raw encoding.
///
/// Any time-of-day component of `local_millis` is dropped; only the local
/// calendar date survives.
pub fn local_floating_to_raw<Z: TimeZone>(
    local_millis: i64,
    encoding: FloatingEncoding,
    tz: &Z,
) -> Result<i64, TimeError> {
    let date = instant(local_millis)?.with_timezone(tz).date_naive();
    Ok(raw_from_date(date, encoding, tz))
}

/// Converts the raw end of an all-day event to canonical local midnight of
/// the first excluded day.
pub fn raw_end_to_local_floating<Z: TimeZone>(
    raw_millis: i64,
    encoding: FloatingEncoding,
    end: AllDayEnd,
    tz: &Z,
) -> Result<i64, TimeError> {
    let mut date = floating_date(raw_millis, encoding, tz)?;
    if end == AllDayEnd::InclusiveEndOfDay {
        date = date
            .checked_add_days(Days::new(1))
            .ok_or(TimeError::OutOfRange(raw_millis))?;
    }
    Ok(local_midnight(date, tz))
}

/// Parses an IANA timezone identifier.
pub fn parse_time_zone(name: &str) -> Result<Tz, TimeError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| TimeError::UnknownTimeZone(name.to_string()))
}

/// Returns the device's current timezone, or UTC if it cannot be determined.
pub fn device_time_zone() -> Tz {
    match iana_time_zone::get_timezone() {
        Ok(name) => parse_time_zone(&name).unwrap_or_else(|err| {
            warn!(%err, "device timezone is not a known IANA zone, using UTC");
            Tz::UTC
        }),
        Err(err) => {
            warn!(%err, "failed to read device timezone, using UTC");
            Tz::UTC
        }
    }
}

/// Resolves an explicit timezone name, or the device timezone when `None`.
pub fn resolve_time_zone(name: Option<&str>) -> Result<Tz, TimeError> {
    match name {
        Some(name) => parse_time_zone(name),
        None => Ok(device_time_zone()),
    }
}

/// A closed range of epoch milliseconds used for backend queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start of the range (inclusive).
    pub start: i64,
    /// End of the range (inclusive).
    pub end: i64,
}

impl TimeRange {
    /// Creates a new range, rejecting `end < start`.
    pub fn new(start: i64, end: i64) -> Result<Self, TimeError> {
        if end < start {
            return Err(TimeError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates the range `[center - radius, center + radius]`.
    pub fn around(center: i64, radius: i64) -> Self {
        let radius = radius.abs();
        Self {
            start: center.saturating_sub(radius),
            end: center.saturating_add(radius),
        }
    }

    /// Length of the range in milliseconds.
    pub fn len_millis(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }

    /// Length of the range in whole days, rounded up.
    pub fn span_days(&self) -> i64 {
        let len = self.len_millis();
        len / MILLIS_PER_DAY + i64::from(len % MILLIS_PER_DAY != 0)
    }

    /// Checks whether `millis` lies within the range.
    pub fn contains(&self, millis: i64) -> bool {
        self.start <= millis && millis <= self.end
    }

    /// Checks whether `[start, end]` intersects this range.
    pub fn overlaps(&self, start: i64, end: i64) -> bool {
        start <= self.end && end >= self.start
    }
}
