//! Process termination by handle or by listening port.

pub mod sockets;

mod termination_error;

#[cfg(unix)]
mod posix;
#[cfg(windows)]
mod windows;

pub use termination_error::{TerminationError, TerminationResult};

#[cfg(unix)]
pub use posix::PosixTerminator;
#[cfg(target_os = "linux")]
pub(crate) use posix::proc_listening_pids;
#[cfg(windows)]
pub use windows::WindowsTerminator;

use crate::launcher::ProcessHandle;

use std::sync::Arc;

pub enum TerminationTarget<'a> {
    /// A process this orchestrator launched.
    Handle(&'a mut ProcessHandle),
    /// Whatever is listening on the port. Recovery path when the handle is
    /// lost or the service was started elsewhere.
    Port(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    Graceful,
    Force,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationOutcome {
    Terminated { pids: Vec<u32> },
    /// Nothing to terminate. Counts as success.
    AlreadyStopped,
}

/// Blocking; called from the blocking pool.
pub trait ProcessTerminator: Send + Sync {
    fn terminate(
        &self,
        target: TerminationTarget<'_>,
        mode: StopMode,
    ) -> TerminationResult<TerminationOutcome>;
}

/// The terminator for the current platform.
pub fn platform_terminator() -> Arc<dyn ProcessTerminator> {
    #[cfg(unix)]
    {
        Arc::new(PosixTerminator)
    }

    #[cfg(windows)]
    {
        Arc::new(WindowsTerminator)
    }
}
