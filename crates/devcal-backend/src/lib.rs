//! Calendar backend abstraction.
//!
//! - [`CalendarBackend`] - the trait a native calendar store adapter implements
//! - [`RawEventRow`] / [`RawCalendar`] - rows as the store reports them
//! - [`map_event_row`] - the single raw-to-canonical mapping
//! - [`resolve`] - instance id lookup with occurrence matching
//! - [`BackendProfile`] - the conventions of one store
//! - [`MemoryBackend`] - an in-memory store
//!
//! ```text
//!  native store ──► CalendarBackend ──► RawEventRow ──► map_event_row() ──► EventRecord
//!                         ▲                                  ▲
//!                         └────────── BackendProfile ────────┘
//! ```

pub mod backend;
pub mod error;
pub mod mapper;
pub mod memory;
pub mod profile;
pub mod raw;
pub mod resolver;

pub use backend::{
    BoxFuture, CalendarBackend, EventMutation, MutationOutcome, MutationSpan, RangeQuery,
};
pub use error::{BackendError, BackendErrorCode, BackendResult};
pub use mapper::{map_calendar_row, map_event_row, map_event_rows};
pub use memory::MemoryBackend;
pub use profile::{AllDayTimeZone, BackendProfile};
pub use raw::{CalendarPatch, EventFields, NewCalendar, RawCalendar, RawEventRow};
pub use resolver::{OCCURRENCE_WINDOW_MS, resolve, resolve_row};
