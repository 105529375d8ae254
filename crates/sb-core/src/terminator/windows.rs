use crate::launcher::ProcessHandle;
use crate::terminator::{
    ProcessTerminator, StopMode, TerminationError, TerminationOutcome, TerminationResult,
    TerminationTarget, sockets,
};

use std::process::Command;

use tracing::{debug, info};

/// `taskkill` reports this when the pid does not exist.
const TASKKILL_NOT_FOUND: i32 = 128;

/// Tree termination through `taskkill /T`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsTerminator;

impl ProcessTerminator for WindowsTerminator {
    fn terminate(
        &self,
        target: TerminationTarget<'_>,
        mode: StopMode,
    ) -> TerminationResult<TerminationOutcome> {
        match target {
            TerminationTarget::Handle(handle) => terminate_handle(handle, mode),
            TerminationTarget::Port(port) => terminate_port(port, mode),
        }
    }
}

fn terminate_handle(
    handle: &mut ProcessHandle,
    mode: StopMode,
) -> TerminationResult<TerminationOutcome> {
    let pid = handle.pid();

    if !handle.is_running() {
        debug!(pid, "Process already exited");
        return Ok(TerminationOutcome::AlreadyStopped);
    }

    if taskkill(pid, mode)? {
        handle.is_running();
        Ok(TerminationOutcome::Terminated { pids: vec![pid] })
    } else {
        Ok(TerminationOutcome::AlreadyStopped)
    }
}

fn terminate_port(port: u16, mode: StopMode) -> TerminationResult<TerminationOutcome> {
    let output = Command::new("netstat")
        .args(["-ano", "-p", "TCP"])
        .output()
        .map_err(|e| TerminationError::enumeration(port, format!("netstat: {e}")))?;

    if !output.status.success() {
        return Err(TerminationError::enumeration(
            port,
            format!("netstat exited with {}", output.status),
        ));
    }

    let own_pid = std::process::id();
    let pids: Vec<u32> =
        sockets::parse_netstat_listeners(&String::from_utf8_lossy(&output.stdout), port)
            .into_iter()
            .filter(|&pid| pid != own_pid)
            .collect();

    let mut killed = Vec::with_capacity(pids.len());
    for pid in pids {
        if taskkill(pid, mode)? {
            killed.push(pid);
        }
    }

    if killed.is_empty() {
        debug!(port, "No process listening");
        return Ok(TerminationOutcome::AlreadyStopped);
    }

    info!(port, pids = ?killed, "Terminated port listeners");
    Ok(TerminationOutcome::Terminated { pids: killed })
}

/// `Ok(false)` when the pid no longer exists.
fn taskkill(pid: u32, mode: StopMode) -> TerminationResult<bool> {
    let pid_arg = pid.to_string();
    let mut args = vec!["/PID", pid_arg.as_str(), "/T"];
    if mode == StopMode::Force {
        args.push("/F");
    }

    let output = Command::new("taskkill")
        .args(&args)
        .output()
        .map_err(|e| TerminationError::denied(pid, format!("taskkill: {e}")))?;

    match output.status.code() {
        Some(0) => {
            info!(pid, ?mode, "taskkill succeeded");
            Ok(true)
        }
        Some(TASKKILL_NOT_FOUND) => Ok(false),
        _ => Err(TerminationError::denied(
            pid,
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        )),
    }
}
