//! Calendar operations.

use std::sync::Arc;

use devcal_backend::{CalendarBackend, CalendarPatch, NewCalendar, RawCalendar, map_calendar_row};
use devcal_core::Calendar;
use tracing::debug;

use crate::error::{CalendarError, CalendarResult, backend_failure};
use crate::permissions::{AccessLevel, PermissionHost, check_access};
use crate::validate;

/// List, create, rename/recolor and delete calendars.
pub struct CalendarOps {
    backend: Arc<dyn CalendarBackend>,
    permissions: Arc<dyn PermissionHost>,
}

impl CalendarOps {
    pub fn new(backend: Arc<dyn CalendarBackend>, permissions: Arc<dyn PermissionHost>) -> Self {
        Self {
            backend,
            permissions,
        }
    }

    pub async fn list_calendars(&self) -> CalendarResult<Vec<Calendar>> {
        debug!("list_calendars");
        check_access(self.permissions.as_ref(), AccessLevel::Read)?;
        let rows = self
            .backend
            .list_calendars()
            .await
            .map_err(backend_failure("list_calendars"))?;
        Ok(rows.iter().map(map_calendar_row).collect())
    }

    /// Creates a local calendar and returns its id.
    pub async fn create_calendar(
        &self,
        name: &str,
        color_hex: Option<&str>,
    ) -> CalendarResult<String> {
        let name = validate::non_empty("name", name)?;
        let color = color_hex.map(validate::color).transpose()?;
        debug!(name, color = ?color_hex, "create_calendar");
        check_access(self.permissions.as_ref(), AccessLevel::Write)?;

        let id = self
            .backend
            .create_calendar(NewCalendar {
                name: name.to_string(),
                color: color.map(|c| c.rgb()),
            })
            .await
            .map_err(backend_failure("create_calendar"))?;
        if id.is_empty() {
            return Err(CalendarError::unknown("the calendar store returned no calendar id"));
        }
        Ok(id)
    }

    /// Changes the name and/or color of a calendar.
    pub async fn update_calendar(
        &self,
        calendar_id: &str,
        name: Option<&str>,
        color_hex: Option<&str>,
    ) -> CalendarResult<()> {
        let calendar_id = validate::non_empty("calendarId", calendar_id)?;
        if name.is_none() && color_hex.is_none() {
            return Err(CalendarError::invalid_arguments(
                "at least one of name or colorHex is required",
            ));
        }
        let patch = CalendarPatch {
            name: name
                .map(|n| validate::non_empty("name", n).map(str::to_string))
                .transpose()?,
            color: color_hex
                .map(|c| validate::color(c).map(|c| c.rgb()))
                .transpose()?,
        };
        debug!(calendar_id, "update_calendar");
        check_access(self.permissions.as_ref(), AccessLevel::Write)?;

        self.writable_calendar(calendar_id).await?;
        let changed = self
            .backend
            .update_calendar(calendar_id, patch)
            .await
            .map_err(backend_failure("update_calendar"))?;
        if changed == 0 {
            return Err(not_found(calendar_id));
        }
        Ok(())
    }

    pub async fn delete_calendar(&self, calendar_id: &str) -> CalendarResult<()> {
        let calendar_id = validate::non_empty("calendarId", calendar_id)?;
        debug!(calendar_id, "delete_calendar");
        check_access(self.permissions.as_ref(), AccessLevel::Write)?;

        self.writable_calendar(calendar_id).await?;
        let removed = self
            .backend
            .delete_calendar(calendar_id)
            .await
            .map_err(backend_failure("delete_calendar"))?;
        if removed == 0 {
            return Err(not_found(calendar_id));
        }
        Ok(())
    }

    /// Fetches a calendar that exists and accepts writes.
    pub(crate) async fn writable_calendar(&self, calendar_id: &str) -> CalendarResult<RawCalendar> {
        writable_calendar(self.backend.as_ref(), calendar_id).await
    }
}

pub(crate) async fn writable_calendar(
    backend: &dyn CalendarBackend,
    calendar_id: &str,
) -> CalendarResult<RawCalendar> {
    let calendar = backend
        .get_calendar(calendar_id)
        .await
        .map_err(backend_failure("get_calendar"))?
        .ok_or_else(|| not_found(calendar_id))?;
    if calendar.read_only {
        return Err(CalendarError::read_only(format!(
            "calendar {calendar_id} is read-only"
        )));
    }
    Ok(calendar)
}

fn not_found(calendar_id: &str) -> CalendarError {
    CalendarError::not_found(format!("calendar {calendar_id} not found"))
}
