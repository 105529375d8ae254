mod probe;


use crate::registry::ServiceDescriptor;

use std::net::TcpListener;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::ProcessHandle;

pub(crate) fn descriptor(id: &str, port: u16, deps: &[&str]) -> ServiceDescriptor {
    ServiceDescriptor::new(id, vec!["true".into()], ".", port).with_dependencies(deps)
}

pub(crate) fn shell(id: &str, dir: &Path, script: &str) -> ServiceDescriptor {
    ServiceDescriptor::new(
        id,
        vec!["sh".into(), "-c".into(), script.into()],
        dir,
        free_port(),
    )
}

/// A port nothing is listening on (bound then released).
pub(crate) fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Poll until the handle's process has exited, or give up after `timeout`.
pub(crate) fn wait_for_exit(handle: &mut ProcessHandle, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if !handle.is_running() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    !handle.is_running()
}
