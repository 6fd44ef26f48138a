//! Core types: event records, calendars, instance ids, floating dates

pub mod calendar;
pub mod event;
pub mod instance;
pub mod time;
pub mod tracing;

pub use calendar::{AccountType, Calendar, ColorError, ColorHex};
pub use event::{Availability, EventRecord, EventStatus, UnknownValue};
pub use instance::{InstanceId, InstanceIdError, decode_instance_id, encode_instance_id};
pub use time::{
    AllDayEnd, FloatingEncoding, MILLIS_PER_DAY, TimeError, TimeRange, device_time_zone,
    floating_date, local_floating_to_raw, local_midnight, parse_time_zone,
    raw_end_to_local_floating, raw_from_date, raw_to_local_floating, resolve_time_zone,
};
pub use tracing::{LogFormat, TracingConfig, TracingError, init_tracing};
