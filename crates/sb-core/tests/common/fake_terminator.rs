use crate::common::Listeners;

use sb_core::{
    ProcessTerminator, StopMode, TerminationError, TerminationOutcome, TerminationTarget,
};

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Closes listeners instead of killing processes.
pub struct FakeTerminator {
    listeners: Listeners,
    ignore_graceful: AtomicBool,
    deny: AtomicBool,
    calls: Mutex<Vec<(u16, StopMode)>>,
}

impl FakeTerminator {
    pub fn new(listeners: Listeners) -> Self {
        Self {
            listeners,
            ignore_graceful: AtomicBool::new(false),
            deny: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Graceful requests are acknowledged but the listener stays open.
    pub fn ignore_graceful(&self) {
        self.ignore_graceful.store(true, Ordering::SeqCst);
    }

    pub fn deny_all(&self) {
        self.deny.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<(u16, StopMode)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProcessTerminator for FakeTerminator {
    fn terminate(
        &self,
        target: TerminationTarget<'_>,
        mode: StopMode,
    ) -> Result<TerminationOutcome, TerminationError> {
        // Fake handles are untracked, so the orchestrator always targets ports
        let TerminationTarget::Port(port) = target else {
            panic!("fake handles are never running");
        };
        self.calls.lock().unwrap().push((port, mode));

        if self.deny.load(Ordering::SeqCst) {
            return Err(TerminationError::denied(1, "operation not permitted"));
        }
        if mode == StopMode::Graceful && self.ignore_graceful.load(Ordering::SeqCst) {
            return Ok(TerminationOutcome::Terminated { pids: vec![1] });
        }

        if self.listeners.close(port) {
            Ok(TerminationOutcome::Terminated { pids: vec![1] })
        } else {
            Ok(TerminationOutcome::AlreadyStopped)
        }
    }
}
