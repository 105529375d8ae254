use std::process::Child;

use tracing::{debug, warn};

/// Opaque handle to a launched service process.
///
/// Owns the `Child` so exited processes are reaped. Handles built with
/// [`ProcessHandle::untracked`] have no child to poll and always report as
/// not running; their liveness is judged by the port alone.
#[derive(Debug)]
pub struct ProcessHandle {
    pid: u32,
    child: Option<Child>,
}

impl ProcessHandle {
    pub fn new(child: Child) -> Self {
        Self {
            pid: child.id(),
            child: Some(child),
        }
    }

    pub fn untracked(pid: u32) -> Self {
        Self {
            pid,
            child: None,
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Non-blocking. Reaps the child if it has exited.
    pub fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Exit code once the child has been reaped.
    pub fn exit_code(&mut self) -> Option<i32> {
        self.child
            .as_mut()
            .and_then(|child| child.try_wait().ok().flatten())
            .and_then(|status| status.code())
    }

    /// Give up ownership without stopping the process. A child that is still
    /// running is reaped from a background thread once it exits.
    pub fn release(mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        if !matches!(child.try_wait(), Ok(None)) {
            return;
        }

        let pid = self.pid;
        let reaper = std::thread::Builder::new()
            .name(format!("reap-{pid}"))
            .spawn(move || {
                let status = child.wait();
                debug!(pid, ?status, "Released process exited");
            });
        if let Err(e) = reaper {
            warn!(pid, error = %e, "Failed to spawn reaper thread");
        }
    }
}
