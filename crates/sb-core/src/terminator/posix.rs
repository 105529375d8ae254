use crate::launcher::ProcessHandle;
use crate::terminator::{
    ProcessTerminator, StopMode, TerminationError, TerminationOutcome, TerminationResult,
    TerminationTarget,
};

use nix::errno::Errno;
use nix::sys::signal::{Signal, kill, killpg};
use nix::unistd::Pid;
use tracing::{debug, info};

/// Signals process groups for owned handles and individual pids for
/// port-only targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct PosixTerminator;

impl ProcessTerminator for PosixTerminator {
    fn terminate(
        &self,
        target: TerminationTarget<'_>,
        mode: StopMode,
    ) -> TerminationResult<TerminationOutcome> {
        match target {
            TerminationTarget::Handle(handle) => terminate_group(handle, mode),
            TerminationTarget::Port(port) => terminate_port(port, mode),
        }
    }
}

fn signal_for(mode: StopMode) -> Signal {
    match mode {
        StopMode::Graceful => Signal::SIGTERM,
        StopMode::Force => Signal::SIGKILL,
    }
}

/// Pids 0 and 1 address our own group and init; never signal them.
fn target_pid(pid: u32) -> TerminationResult<Pid> {
    match i32::try_from(pid) {
        Ok(raw) if raw > 1 => Ok(Pid::from_raw(raw)),
        _ => Err(TerminationError::denied(pid, "not a signallable pid")),
    }
}

fn terminate_group(
    handle: &mut ProcessHandle,
    mode: StopMode,
) -> TerminationResult<TerminationOutcome> {
    let pid = handle.pid();
    let signal = signal_for(mode);

    // setsid at launch makes the pid the process group id
    match killpg(target_pid(pid)?, signal) {
        Ok(()) => {
            info!(pid, %signal, "Signalled process group");
            // reap if it already exited
            handle.is_running();
            Ok(TerminationOutcome::Terminated { pids: vec![pid] })
        }
        Err(Errno::ESRCH) => {
            handle.is_running();
            debug!(pid, "Process group already gone");
            Ok(TerminationOutcome::AlreadyStopped)
        }
        Err(errno) => Err(TerminationError::denied(pid, errno.desc())),
    }
}

fn terminate_port(port: u16, mode: StopMode) -> TerminationResult<TerminationOutcome> {
    let own_pid = std::process::id();
    let signal = signal_for(mode);

    let pids: Vec<u32> = listening_pids(port)?
        .into_iter()
        .filter(|&pid| pid != own_pid)
        .collect();

    if pids.is_empty() {
        debug!(port, "No process listening");
        return Ok(TerminationOutcome::AlreadyStopped);
    }

    let mut signalled = Vec::with_capacity(pids.len());
    for pid in pids {
        match kill(target_pid(pid)?, signal) {
            Ok(()) => signalled.push(pid),
            Err(Errno::ESRCH) => {}
            Err(errno) => return Err(TerminationError::denied(pid, errno.desc())),
        }
    }

    if signalled.is_empty() {
        return Ok(TerminationOutcome::AlreadyStopped);
    }

    info!(port, pids = ?signalled, %signal, "Signalled port listeners");
    Ok(TerminationOutcome::Terminated { pids: signalled })
}

#[cfg(target_os = "linux")]
fn listening_pids(port: u16) -> TerminationResult<Vec<u32>> {
    proc_listening_pids(std::path::Path::new("/proc"), port)
}

/// Owners of the LISTEN sockets on `port`, found by matching socket inodes in
/// `<proc>/net/tcp{,6}` against every `<proc>/<pid>/fd` link.
///
/// A listening socket with no readable owner (another user's process) is
/// reported as denied rather than as nothing listening.
#[cfg(target_os = "linux")]
pub(crate) fn proc_listening_pids(
    proc_root: &std::path::Path,
    port: u16,
) -> TerminationResult<Vec<u32>> {
    use crate::terminator::sockets;

    use std::collections::HashSet;
    use std::fs;

    let mut inodes = HashSet::new();
    for table in ["tcp", "tcp6"] {
        let path = proc_root.join("net").join(table);
        match fs::read_to_string(&path) {
            Ok(contents) => inodes.extend(sockets::parse_proc_net_tcp(&contents, port)),
            // no IPv6 on this kernel
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(TerminationError::enumeration(
                    port,
                    format!("{}: {e}", path.display()),
                ));
            }
        }
    }

    if inodes.is_empty() {
        return Ok(Vec::new());
    }

    let proc_entries =
        fs::read_dir(proc_root).map_err(|e| TerminationError::enumeration(port, e.to_string()))?;

    let mut pids = Vec::new();
    for entry in proc_entries.flatten() {
        let Some(pid) = entry.file_name().to_str().and_then(|n| n.parse::<u32>().ok()) else {
            continue;
        };
        // other users' fds are unreadable
        let Ok(fds) = fs::read_dir(entry.path().join("fd")) else {
            continue;
        };
        let owns_socket = fds.flatten().any(|fd| {
            fs::read_link(fd.path())
                .ok()
                .and_then(|target| sockets::parse_socket_link(&target.to_string_lossy()))
                .is_some_and(|inode| inodes.contains(&inode))
        });
        if owns_socket {
            pids.push(pid);
        }
    }

    if pids.is_empty() {
        return Err(TerminationError::owner_unreadable(port));
    }

    Ok(pids)
}

#[cfg(not(target_os = "linux"))]
fn listening_pids(port: u16) -> TerminationResult<Vec<u32>> {
    use crate::terminator::sockets;

    let output = std::process::Command::new("lsof")
        .args(["-t", &format!("-iTCP:{port}"), "-sTCP:LISTEN"])
        .output()
        .map_err(|e| TerminationError::enumeration(port, format!("lsof: {e}")))?;

    // lsof exits 1 with empty output when nothing matches
    Ok(sockets::parse_lsof_pids(&String::from_utf8_lossy(
        &output.stdout,
    )))
}
