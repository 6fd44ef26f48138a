//! Calendar and event facades behind a device-calendar plugin.
//!
//! - [`CalendarOps`] / [`EventOps`] validate arguments, check permissions,
//!   delegate to a [`CalendarBackend`](devcal_backend::CalendarBackend) and
//!   translate every failure into a [`CalendarError`]
//! - [`PermissionBroker`] runs the permission request flow
//! - [`MethodHandler`] dispatches [`MethodCall`](devcal_protocol::MethodCall)s
//! - [`BridgeConfig`] holds the device timezone and backend profile

pub mod calendars;
pub mod config;
pub mod error;
pub mod events;
pub mod handler;
pub mod permissions;
mod validate;

pub use calendars::CalendarOps;
pub use config::{BridgeConfig, ConfigError};
pub use error::{
    CalendarError, CalendarResult, PERMISSIONS_NOT_DECLARED_GUIDANCE, SINGLE_OCCURRENCE_GUIDANCE,
};
pub use events::EventOps;
pub use handler::{MethodHandler, protocol_error_response};
pub use permissions::{
    AccessLevel, PermissionBroker, PermissionHost, StaticPermissionHost, check_access,
};
