use crate::launcher::{LaunchResult, LaunchSettings, ProcessHandle, ProcessLauncher, command};
use crate::registry::ServiceDescriptor;

use std::os::unix::process::CommandExt;

/// Places each service in its own session so the whole process group can be
/// signalled at once.
#[derive(Debug, Clone, Default)]
pub struct PosixLauncher {
    settings: LaunchSettings,
}

impl PosixLauncher {
    pub fn new(settings: LaunchSettings) -> Self {
        Self { settings }
    }
}

impl ProcessLauncher for PosixLauncher {
    fn launch(&self, descriptor: &ServiceDescriptor) -> LaunchResult<ProcessHandle> {
        command::ensure_working_dir(descriptor)?;
        command::run_setup(descriptor, &self.settings)?;

        let mut cmd = command::service_command(descriptor, &self.settings)?;

        // Detach: new session, process group id == pid
        unsafe {
            cmd.pre_exec(|| {
                if libc::setsid() == -1 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }

        command::spawn(cmd, descriptor)
    }
}
