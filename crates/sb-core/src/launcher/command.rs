//! Platform-neutral launch steps shared by every launcher.

use crate::launcher::{LaunchError, LaunchResult, LaunchSettings, ProcessHandle};
use crate::registry::ServiceDescriptor;

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

const SETUP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Windows resolves `npm`, `streamlit` and friends through `.cmd` shims,
/// which only the command interpreter can run.
pub(super) fn platform_argv(command: &[String]) -> Vec<String> {
    #[cfg(windows)]
    {
        let mut argv = vec!["cmd".to_string(), "/C".to_string()];
        argv.extend(command.iter().cloned());
        argv
    }

    #[cfg(not(windows))]
    {
        command.to_vec()
    }
}

pub(super) fn ensure_working_dir(descriptor: &ServiceDescriptor) -> LaunchResult<()> {
    if descriptor.working_dir.is_dir() {
        Ok(())
    } else {
        Err(LaunchError::path_not_found(&descriptor.working_dir))
    }
}

/// Run the setup step to completion if one is declared and its marker is
/// missing.
pub(super) fn run_setup(descriptor: &ServiceDescriptor, settings: &LaunchSettings) -> LaunchResult<()> {
    let Some(setup) = &descriptor.setup else {
        return Ok(());
    };

    if let Some(marker) = &setup.marker
        && descriptor.working_dir.join(marker).exists()
    {
        debug!(service = %descriptor.id, marker = %marker.display(), "Setup marker present, skipping setup");
        return Ok(());
    }

    let command_line = setup.command.join(" ");
    let argv = platform_argv(&setup.command);
    let Some((program, args)) = argv.split_first() else {
        return Err(LaunchError::setup_failed(command_line, "empty command"));
    };

    info!(service = %descriptor.id, command = %command_line, "Running setup");

    let (stdout, stderr) = output_stdio(settings, &descriptor.id);
    let mut child = Command::new(program)
        .args(args)
        .current_dir(&descriptor.working_dir)
        .stdin(Stdio::null())
        .stdout(stdout)
        .stderr(stderr)
        .spawn()
        .map_err(|e| LaunchError::setup_failed(&command_line, e.to_string()))?;

    let deadline = Instant::now() + settings.setup_timeout;

    loop {
        match child.try_wait() {
            Ok(Some(status)) if status.success() => {
                info!(service = %descriptor.id, "Setup completed");
                return Ok(());
            }
            Ok(Some(status)) => {
                return Err(LaunchError::setup_failed(
                    command_line,
                    format!("exited with {status}"),
                ));
            }
            Ok(None) if Instant::now() >= deadline => {
                child.kill().ok();
                child.wait().ok();
                return Err(LaunchError::setup_failed(
                    command_line,
                    format!("timed out after {:?}", settings.setup_timeout),
                ));
            }
            Ok(None) => std::thread::sleep(SETUP_POLL_INTERVAL),
            Err(e) => return Err(LaunchError::setup_failed(command_line, e.to_string())),
        }
    }
}

/// Main command with working directory and stdio wired up, not yet spawned.
pub(super) fn service_command(
    descriptor: &ServiceDescriptor,
    settings: &LaunchSettings,
) -> LaunchResult<Command> {
    let argv = platform_argv(&descriptor.command);
    let Some((program, args)) = argv.split_first() else {
        return Err(LaunchError::spawn_failed(
            descriptor.command_line(),
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        ));
    };

    let (stdout, stderr) = output_stdio(settings, &descriptor.id);
    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(&descriptor.working_dir)
        .stdin(Stdio::null())
        .stdout(stdout)
        .stderr(stderr);

    Ok(cmd)
}

pub(super) fn spawn(mut cmd: Command, descriptor: &ServiceDescriptor) -> LaunchResult<ProcessHandle> {
    let child = cmd
        .spawn()
        .map_err(|e| LaunchError::spawn_failed(descriptor.command_line(), e))?;

    let handle = ProcessHandle::new(child);
    info!(service = %descriptor.id, pid = handle.pid(), "Spawned service process");

    Ok(handle)
}

fn output_stdio(settings: &LaunchSettings, service_id: &str) -> (Stdio, Stdio) {
    let Some(dir) = &settings.log_dir else {
        return (Stdio::null(), Stdio::null());
    };

    match open_log(dir, service_id) {
        Ok(file) => match file.try_clone() {
            Ok(clone) => (Stdio::from(file), Stdio::from(clone)),
            Err(e) => {
                warn!(service = service_id, error = %e, "Cannot share log file with stderr");
                (Stdio::from(file), Stdio::null())
            }
        },
        Err(e) => {
            warn!(service = service_id, dir = %dir.display(), error = %e, "Cannot open service log, discarding output");
            (Stdio::null(), Stdio::null())
        }
    }
}

fn open_log(dir: &Path, service_id: &str) -> std::io::Result<File> {
    fs::create_dir_all(dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(format!("{service_id}.log")))
}
