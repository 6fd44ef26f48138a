//! Method dispatch.
//!
//! Routes each [`MethodCall`] to the facade that implements it and folds the
//! result into a [`MethodResponse`]. Every call produces exactly one response.

use std::sync::Arc;

use chrono_tz::Tz;
use devcal_backend::CalendarBackend;
use devcal_protocol::{ErrorCode, MethodCall, MethodResponse, ProtocolError, UpdateCalendarArgs};
use serde_json::Value;
use tracing::{Span, debug};

use crate::calendars::CalendarOps;
use crate::config::{BridgeConfig, ConfigError};
use crate::error::{CalendarError, CalendarResult};
use crate::events::EventOps;
use crate::permissions::{PermissionBroker, PermissionHost};

/// Dispatches method calls to [`CalendarOps`], [`EventOps`] and the
/// [`PermissionBroker`].
pub struct MethodHandler {
    calendars: CalendarOps,
    events: EventOps,
    permissions: PermissionBroker,
}

impl MethodHandler {
    pub fn new(
        backend: Arc<dyn CalendarBackend>,
        host: Arc<dyn PermissionHost>,
        tz: Tz,
    ) -> Self {
        Self {
            calendars: CalendarOps::new(backend.clone(), host.clone()),
            events: EventOps::new(backend, host.clone(), tz),
            permissions: PermissionBroker::new(host),
        }
    }

    /// Builds a handler using the configured device timezone.
    pub fn from_config(
        config: &BridgeConfig,
        backend: Arc<dyn CalendarBackend>,
        host: Arc<dyn PermissionHost>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(backend, host, config.time_zone()?))
    }

    pub fn calendars(&self) -> &CalendarOps {
        &self.calendars
    }

    pub fn events(&self) -> &EventOps {
        &self.events
    }

    /// The broker that receives permission prompt answers.
    pub fn permissions(&self) -> &PermissionBroker {
        &self.permissions
    }

    /// Handles a single call.
    #[tracing::instrument(skip_all, fields(method = call.method_name(), duration_ms))]
    pub async fn handle(&self, call: MethodCall) -> MethodResponse {
        let start = std::time::Instant::now();

        let response = match self.dispatch(call).await {
            Ok(response) => response,
            Err(err) => {
                debug!(code = %err.code(), message = err.message(), "call failed");
                MethodResponse::from_error(err.into())
            }
        };

        let duration = start.elapsed();
        Span::current().record("duration_ms", duration.as_millis());
        debug!(
            success = response.is_success(),
            duration_ms = duration.as_millis(),
            "call handled"
        );
        response
    }

    /// Handles a call given as a method name and raw JSON arguments.
    ///
    /// Unknown methods answer `NOT_SUPPORTED`; arguments that do not decode
    /// answer `INVALID_ARGUMENTS`.
    pub async fn handle_raw(&self, method: &str, arguments: Value) -> MethodResponse {
        match MethodCall::from_parts(method, arguments) {
            Ok(call) => self.handle(call).await,
            Err(err) => protocol_error_response(&err),
        }
    }

    async fn dispatch(&self, call: MethodCall) -> CalendarResult<MethodResponse> {
        Ok(match call {
            MethodCall::ListCalendars => MethodResponse::Calendars {
                calendars: self.calendars.list_calendars().await?,
            },
            MethodCall::CreateCalendar(args) => MethodResponse::CalendarId {
                calendar_id: self
                    .calendars
                    .create_calendar(&args.name, args.color_hex.as_deref())
                    .await?,
            },
            MethodCall::UpdateCalendar(UpdateCalendarArgs {
                calendar_id,
                name,
                color_hex,
            }) => {
                self.calendars
                    .update_calendar(&calendar_id, name.as_deref(), color_hex.as_deref())
                    .await?;
                MethodResponse::Ok
            }
            MethodCall::DeleteCalendar(args) => {
                self.calendars.delete_calendar(&args.calendar_id).await?;
                MethodResponse::Ok
            }
            MethodCall::RetrieveEvents(args) => MethodResponse::Events {
                events: self
                    .events
                    .retrieve_events(args.start_date, args.end_date, args.calendar_ids)
                    .await?,
            },
            MethodCall::GetEvent(args) => MethodResponse::Event {
                event: self.events.get_event(&args.instance_id).await?,
            },
            MethodCall::CreateEvent(args) => MethodResponse::EventId {
                event_id: self.events.create_event(&args).await?,
            },
            MethodCall::DeleteEvent(args) => {
                self.events
                    .delete_event(&args.instance_id, args.affect_all_instances)
                    .await?;
                MethodResponse::Ok
            }
            MethodCall::UpdateEvent(args) => {
                self.events.update_event(&args).await?;
                MethodResponse::Ok
            }
            MethodCall::RequestPermissions => MethodResponse::PermissionStatus {
                status: self.permissions.request_permissions().await?,
            },
            MethodCall::HasPermissions => MethodResponse::PermissionStatus {
                status: self.permissions.status()?,
            },
        })
    }
}

/// Answers a call that never reached a facade.
pub fn protocol_error_response(err: &ProtocolError) -> MethodResponse {
    let error = match err {
        ProtocolError::UnknownMethod(_) => {
            CalendarError::new(ErrorCode::NotSupported, err.to_string())
        }
        _ => CalendarError::invalid_arguments(err.to_string()),
    };
    MethodResponse::from_error(error.into())
}
