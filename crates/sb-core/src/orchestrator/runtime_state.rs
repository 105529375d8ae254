use crate::error::ErrorKind;
use crate::launcher::ProcessHandle;
use crate::orchestrator::ServiceStatus;

use chrono::{DateTime, Utc};

/// Transitional states the orchestrator asserts itself. Everything else is
/// derived from the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Overlay {
    Starting,
    StopRequested,
}

impl From<Overlay> for ServiceStatus {
    fn from(overlay: Overlay) -> Self {
        match overlay {
            Overlay::Starting => ServiceStatus::Starting,
            Overlay::StopRequested => ServiceStatus::StopRequested,
        }
    }
}

/// Mutable per-service state. Never persisted.
#[derive(Debug, Default)]
pub(crate) struct ServiceRuntimeState {
    pub overlay: Option<Overlay>,
    pub handle: Option<ProcessHandle>,
    pub started_at: Option<DateTime<Utc>>,
    pub last_error: Option<ErrorKind>,
}

impl ServiceRuntimeState {
    pub fn begin(&mut self, overlay: Overlay) {
        self.overlay = Some(overlay);
        if overlay == Overlay::Starting {
            self.started_at = Some(Utc::now());
            self.last_error = None;
        }
    }

    /// Back to a plain probe-derived state with no owned process.
    pub fn reset(&mut self) {
        self.overlay = None;
        self.started_at = None;
        if let Some(handle) = self.handle.take() {
            handle.release();
        }
    }

    /// Track a freshly launched process, releasing any previous one.
    pub fn track(&mut self, handle: ProcessHandle) {
        if let Some(previous) = self.handle.replace(handle) {
            previous.release();
        }
    }

    pub fn fail(&mut self, kind: ErrorKind) {
        self.reset();
        self.last_error = Some(kind);
    }

    /// A stop that gave up. Keeps the handle if the process is still ours.
    pub fn stop_failed(&mut self, handle: Option<ProcessHandle>, kind: ErrorKind) {
        self.overlay = None;
        self.handle = handle;
        self.last_error = Some(kind);
    }
}
