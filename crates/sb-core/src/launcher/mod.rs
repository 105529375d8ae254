//! Detached process launching.

mod command;
mod launch_error;
mod process_handle;

#[cfg(unix)]
mod posix;
#[cfg(windows)]
mod windows;

pub use launch_error::{LaunchError, LaunchResult};
pub use process_handle::ProcessHandle;

#[cfg(unix)]
pub use posix::PosixLauncher;
#[cfg(windows)]
pub use windows::WindowsLauncher;

use crate::registry::ServiceDescriptor;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_SETUP_TIMEOUT: Duration = Duration::from_secs(300);

/// Starts a service's command as a child detached from the orchestrator's
/// process group. Implementations block and are called from the blocking pool.
pub trait ProcessLauncher: Send + Sync {
    /// On success exactly one new long-lived process exists; on failure none.
    fn launch(&self, descriptor: &ServiceDescriptor) -> LaunchResult<ProcessHandle>;
}

#[derive(Debug, Clone)]
pub struct LaunchSettings {
    /// When set, each service's stdout/stderr are appended to `<dir>/<id>.log`.
    pub log_dir: Option<PathBuf>,
    pub setup_timeout: Duration,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            log_dir: None,
            setup_timeout: DEFAULT_SETUP_TIMEOUT,
        }
    }
}

/// The launcher for the current platform.
pub fn platform_launcher(settings: LaunchSettings) -> Arc<dyn ProcessLauncher> {
    #[cfg(unix)]
    {
        Arc::new(PosixLauncher::new(settings))
    }

    #[cfg(windows)]
    {
        Arc::new(WindowsLauncher::new(settings))
    }
}
