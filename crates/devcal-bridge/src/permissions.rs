//! Calendar permission checks and the permission request flow.
//!
//! The host (the OS integration) owns the actual grant state and the prompt.
//! [`PermissionBroker`] makes sure at most one prompt is outstanding and that
//! each prompt's answer is delivered exactly once.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use devcal_protocol::PermissionStatus;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::error::{CalendarError, CalendarResult};

/// Access an operation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Read,
    Write,
}

/// The host side of calendar permissions.
pub trait PermissionHost: Send + Sync {
    /// Whether the application declares calendar permissions at all.
    fn permissions_declared(&self) -> bool;

    /// The current grant state.
    fn status(&self) -> PermissionStatus;

    /// Shows the OS permission prompt. The answer is reported through
    /// [`PermissionBroker::complete`], or [`PermissionBroker::cancel`] when
    /// the prompt goes away without one.
    fn launch_prompt(&self);
}

/// Fails unless the host grants `level`.
pub fn check_access(host: &dyn PermissionHost, level: AccessLevel) -> CalendarResult<()> {
    if !host.permissions_declared() {
        return Err(CalendarError::permissions_not_declared());
    }
    let status = host.status();
    let allowed = match level {
        AccessLevel::Read => status.can_read(),
        AccessLevel::Write => status.can_write(),
    };
    if allowed {
        Ok(())
    } else {
        debug!(?status, ?level, "calendar access refused");
        Err(CalendarError::permission_denied(match level {
            AccessLevel::Read => "calendar read access has not been granted",
            AccessLevel::Write => "calendar write access has not been granted",
        }))
    }
}

/// A host with a settable grant state. Prompts are only counted.
#[derive(Debug)]
pub struct StaticPermissionHost {
    declared: AtomicBool,
    status: Mutex<PermissionStatus>,
    prompts: AtomicUsize,
}

impl StaticPermissionHost {
    pub fn new(status: PermissionStatus) -> Self {
        Self {
            declared: AtomicBool::new(true),
            status: Mutex::new(status),
            prompts: AtomicUsize::new(0),
        }
    }

    pub fn granted() -> Self {
        Self::new(PermissionStatus::Granted)
    }

    pub fn undeclared() -> Self {
        let host = Self::new(PermissionStatus::NotDetermined);
        host.declared.store(false, Ordering::SeqCst);
        host
    }

    pub fn set_status(&self, status: PermissionStatus) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }

    /// Number of prompts launched so far.
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

impl PermissionHost for StaticPermissionHost {
    fn permissions_declared(&self) -> bool {
        self.declared.load(Ordering::SeqCst)
    }

    fn status(&self) -> PermissionStatus {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn launch_prompt(&self) {
        self.prompts.fetch_add(1, Ordering::SeqCst);
    }
}

/// Serializes permission requests and routes the prompt's answer back to
/// the waiting request.
pub struct PermissionBroker {
    host: Arc<dyn PermissionHost>,
    request_lock: tokio::sync::Mutex<()>,
    pending: Mutex<Option<oneshot::Sender<bool>>>,
}

impl PermissionBroker {
    pub fn new(host: Arc<dyn PermissionHost>) -> Self {
        Self {
            host,
            request_lock: tokio::sync::Mutex::new(()),
            pending: Mutex::new(None),
        }
    }

    pub fn host(&self) -> &dyn PermissionHost {
        self.host.as_ref()
    }

    fn pending(&self) -> MutexGuard<'_, Option<oneshot::Sender<bool>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The current grant state.
    pub fn status(&self) -> CalendarResult<PermissionStatus> {
        if !self.host.permissions_declared() {
            return Err(CalendarError::permissions_not_declared());
        }
        Ok(self.host.status())
    }

    /// Asks for calendar access.
    ///
    /// Returns the current status without prompting unless it is
    /// `NotDetermined`. Otherwise launches the prompt and waits for
    /// [`complete`](Self::complete). A second
    /// request made while a prompt is showing waits for the first to finish.
    pub async fn request_permissions(&self) -> CalendarResult<PermissionStatus> {
        if !self.host.permissions_declared() {
            return Err(CalendarError::permissions_not_declared());
        }

        let _serialized = self.request_lock.lock().await;
        let status = self.host.status();
        if status != PermissionStatus::NotDetermined {
            // only an undecided status can prompt
            debug!(?status, "calendar access already decided");
            return Ok(status);
        }

        let (tx, rx) = oneshot::channel();
        *self.pending() = Some(tx);
        info!("launching calendar permission prompt");
        self.host.launch_prompt();

        match rx.await {
            Ok(true) => Ok(PermissionStatus::Granted),
            Ok(false) => Ok(PermissionStatus::Denied),
            Err(_) => {
                warn!("permission prompt closed without an answer");
                Err(CalendarError::unknown(
                    "the permission prompt closed without an answer",
                ))
            }
        }
    }

    /// Delivers the prompt's answer. Returns `false` when no request is
    /// waiting.
    pub fn complete(&self, granted: bool) -> bool {
        let Some(tx) = self.pending().take() else {
            debug!(granted, "permission result with no pending request");
            return false;
        };
        // the waiter may have been dropped
        tx.send(granted).is_ok()
    }

    /// Abandons the pending prompt; the waiting request fails. Returns
    /// `false` when no request is waiting.
    pub fn cancel(&self) -> bool {
        self.pending().take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devcal_protocol::ErrorCode;

    fn broker(host: &Arc<StaticPermissionHost>) -> Arc<PermissionBroker> {
        Arc::new(PermissionBroker::new(host.clone()))
    }

    async fn wait_for_prompt(broker: &PermissionBroker) {
        while !broker.is_pending() {
            tokio::task::yield_now().await;
        }
    }

    mod access {
        use super::*;

        #[test]
        fn write_only_allows_writes_only() {
            let host = StaticPermissionHost::new(PermissionStatus::WriteOnly);
            assert!(check_access(&host, AccessLevel::Write).is_ok());
            let err = check_access(&host, AccessLevel::Read).unwrap_err();
            assert_eq!(err.code(), ErrorCode::PermissionDenied);
        }

        #[test]
        fn restricted_allows_nothing() {
            let host = StaticPermissionHost::new(PermissionStatus::Restricted);
            assert!(check_access(&host, AccessLevel::Read).is_err());
            assert!(check_access(&host, AccessLevel::Write).is_err());
        }

        #[test]
        fn undeclared_wins_over_status() {
            let host = StaticPermissionHost::undeclared();
            host.set_status(PermissionStatus::Granted);
            let err = check_access(&host, AccessLevel::Read).unwrap_err();
            assert_eq!(err.code(), ErrorCode::PermissionsNotDeclared);
        }
    }

    mod requests {
        use super::*;

        #[tokio::test]
        async fn granted_skips_prompt() {
            let host = Arc::new(StaticPermissionHost::granted());
            let broker = broker(&host);
            assert_eq!(
                broker.request_permissions().await.unwrap(),
                PermissionStatus::Granted
            );
            assert_eq!(host.prompt_count(), 0);
        }

        #[tokio::test]
        async fn decided_status_skips_prompt() {
            for status in [
                PermissionStatus::Denied,
                PermissionStatus::Restricted,
                PermissionStatus::WriteOnly,
            ] {
                let host = Arc::new(StaticPermissionHost::new(status));
                let broker = broker(&host);
                assert_eq!(broker.request_permissions().await.unwrap(), status);
                assert_eq!(host.prompt_count(), 0);
                assert!(!broker.is_pending());
            }
        }

        #[tokio::test]
        async fn undeclared_never_prompts() {
            let host = Arc::new(StaticPermissionHost::undeclared());
            let broker = broker(&host);
            let err = broker.request_permissions().await.unwrap_err();
            assert_eq!(err.code(), ErrorCode::PermissionsNotDeclared);
            assert!(err.message().contains("AndroidManifest.xml"));
            assert_eq!(host.prompt_count(), 0);
            assert!(broker.status().is_err());
        }

        #[tokio::test]
        async fn completion_fires_once() {
            let host = Arc::new(StaticPermissionHost::new(PermissionStatus::NotDetermined));
            let broker = broker(&host);

            let request = tokio::spawn({
                let broker = broker.clone();
                async move { broker.request_permissions().await }
            });
            wait_for_prompt(&broker).await;
            assert_eq!(host.prompt_count(), 1);

            assert!(broker.complete(true));
            assert!(!broker.complete(true));
            assert!(!broker.is_pending());

            let status = request.await.unwrap().unwrap();
            assert_eq!(status, PermissionStatus::Granted);
        }

        #[tokio::test]
        async fn denial_is_reported() {
            let host = Arc::new(StaticPermissionHost::new(PermissionStatus::NotDetermined));
            let broker = broker(&host);

            let request = tokio::spawn({
                let broker = broker.clone();
                async move { broker.request_permissions().await }
            });
            wait_for_prompt(&broker).await;
            assert!(broker.complete(false));
            assert_eq!(
                request.await.unwrap().unwrap(),
                PermissionStatus::Denied
            );
        }

        #[tokio::test]
        async fn stray_completion_is_ignored() {
            let host = Arc::new(StaticPermissionHost::granted());
            let broker = broker(&host);
            assert!(!broker.complete(true));
            assert!(!broker.cancel());
        }

        #[tokio::test]
        async fn cancelled_prompt_is_unknown_error() {
            let host = Arc::new(StaticPermissionHost::new(PermissionStatus::NotDetermined));
            let broker = broker(&host);

            let request = tokio::spawn({
                let broker = broker.clone();
                async move { broker.request_permissions().await }
            });
            wait_for_prompt(&broker).await;
            assert!(broker.cancel());

            let err = request.await.unwrap().unwrap_err();
            assert_eq!(err.code(), ErrorCode::UnknownError);
        }

        #[tokio::test]
        async fn second_request_waits_for_first() {
            let host = Arc::new(StaticPermissionHost::new(PermissionStatus::NotDetermined));
            let broker = broker(&host);

            let first = tokio::spawn({
                let broker = broker.clone();
                async move { broker.request_permissions().await }
            });
            wait_for_prompt(&broker).await;

            let second = tokio::spawn({
                let broker = broker.clone();
                async move { broker.request_permissions().await }
            });
            for _ in 0..10 {
                tokio::task::yield_now().await;
            }
            assert!(!second.is_finished());
            assert_eq!(host.prompt_count(), 1);

            // the OS records the grant before reporting it
            host.set_status(PermissionStatus::Granted);
            assert!(broker.complete(true));

            assert_eq!(first.await.unwrap().unwrap(), PermissionStatus::Granted);
            assert_eq!(second.await.unwrap().unwrap(), PermissionStatus::Granted);
            assert_eq!(host.prompt_count(), 1);
            assert!(!broker.complete(true));
        }
    }
}
