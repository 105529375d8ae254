use crate::common::Listeners;

use sb_core::{LaunchError, ProcessHandle, ProcessLauncher, ServiceDescriptor};

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// Bind the primary port before returning
    BindImmediately,
    /// Bind from a background thread after the delay
    BindAfter(Duration),
    /// Spawn "successfully" but never listen
    NeverBind,
    /// Fail the launch
    Fail,
}

#[derive(Debug, Clone)]
pub struct LaunchRecord {
    pub service_id: String,
    /// Ports bound in the listener table at the moment of launch
    pub open_ports: Vec<u16>,
}

pub struct FakeLauncher {
    listeners: Listeners,
    behaviors: Mutex<HashMap<String, Behavior>>,
    launches: Mutex<Vec<LaunchRecord>>,
    next_pid: AtomicU32,
}

impl FakeLauncher {
    pub fn new(listeners: Listeners) -> Self {
        Self {
            listeners,
            behaviors: Mutex::new(HashMap::new()),
            launches: Mutex::new(Vec::new()),
            next_pid: AtomicU32::new(40_000),
        }
    }

    pub fn set_behavior(&self, service_id: &str, behavior: Behavior) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(service_id.to_string(), behavior);
    }

    pub fn launches(&self) -> Vec<LaunchRecord> {
        self.launches.lock().unwrap().clone()
    }

    pub fn launched_ids(&self) -> Vec<String> {
        self.launches().into_iter().map(|r| r.service_id).collect()
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&self, descriptor: &ServiceDescriptor) -> Result<ProcessHandle, LaunchError> {
        let behavior = self
            .behaviors
            .lock()
            .unwrap()
            .get(&descriptor.id)
            .copied()
            .unwrap_or(Behavior::BindImmediately);

        if let Behavior::Fail = behavior {
            return Err(LaunchError::path_not_found(&descriptor.working_dir));
        }

        self.launches.lock().unwrap().push(LaunchRecord {
            service_id: descriptor.id.clone(),
            open_ports: self.listeners.bound_ports(),
        });

        let port = descriptor.port;
        match behavior {
            Behavior::BindImmediately => self.listeners.bind(port),
            Behavior::BindAfter(delay) => {
                let listeners = self.listeners.clone();
                std::thread::spawn(move || {
                    std::thread::sleep(delay);
                    listeners.bind(port);
                });
            }
            Behavior::NeverBind | Behavior::Fail => {}
        }

        Ok(ProcessHandle::untracked(
            self.next_pid.fetch_add(1, Ordering::SeqCst),
        ))
    }
}
