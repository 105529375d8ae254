use crate::launcher::{LaunchResult, LaunchSettings, ProcessHandle, ProcessLauncher, command};
use crate::registry::ServiceDescriptor;

use std::os::windows::process::CommandExt;

use windows_sys::Win32::System::Threading::{CREATE_NEW_CONSOLE, CREATE_NEW_PROCESS_GROUP};

/// Gives each service its own console and process group so `taskkill /T`
/// can take down the whole tree.
#[derive(Debug, Clone, Default)]
pub struct WindowsLauncher {
    settings: LaunchSettings,
}

impl WindowsLauncher {
    pub fn new(settings: LaunchSettings) -> Self {
        Self { settings }
    }
}

impl ProcessLauncher for WindowsLauncher {
    fn launch(&self, descriptor: &ServiceDescriptor) -> LaunchResult<ProcessHandle> {
        command::ensure_working_dir(descriptor)?;
        command::run_setup(descriptor, &self.settings)?;

        let mut cmd = command::service_command(descriptor, &self.settings)?;
        cmd.creation_flags(CREATE_NEW_CONSOLE | CREATE_NEW_PROCESS_GROUP);

        command::spawn(cmd, descriptor)
    }
}
