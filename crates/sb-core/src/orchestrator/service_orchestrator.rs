//! Service lifecycle orchestration.
//!
//! Status is never cached: every query re-probes the service's ports, and the
//! only asserted states are the `Starting` / `StopRequested` overlays held
//! while a transition is in flight.

use crate::error::{ServiceError, ServiceResult};
use crate::launcher::{ProcessHandle, ProcessLauncher, platform_launcher};
use crate::orchestrator::runtime_state::{Overlay, ServiceRuntimeState};
use crate::orchestrator::{
    OperationReport, OrchestratorSettings, ServiceSnapshot, ServiceStatus, StartOutcome,
    StopOutcome,
};
use crate::probe::{PortProbe, TcpPortProbe};
use crate::registry::{Registry, ServiceDescriptor};
use crate::terminator::{
    ProcessTerminator, StopMode, TerminationOutcome, TerminationTarget, platform_terminator,
};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::{BoxFuture, FutureExt, join_all};
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};

struct ServiceSlot {
    descriptor: ServiceDescriptor,
    /// Held for the whole of a start or stop. Status queries never take it.
    transition: Mutex<()>,
    runtime: RwLock<ServiceRuntimeState>,
}

impl ServiceSlot {
    fn new(descriptor: ServiceDescriptor) -> Self {
        Self {
            descriptor,
            transition: Mutex::new(()),
            runtime: RwLock::new(ServiceRuntimeState::default()),
        }
    }
}

/// Owns the runtime state of every registered service.
pub struct Orchestrator {
    registry: Registry,
    slots: HashMap<String, ServiceSlot>,
    probe: Arc<dyn PortProbe>,
    launcher: Arc<dyn ProcessLauncher>,
    terminator: Arc<dyn ProcessTerminator>,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    /// Orchestrator using the TCP probe and this platform's launcher and
    /// terminator.
    pub fn new(registry: Registry, settings: OrchestratorSettings) -> Self {
        let probe = Arc::new(TcpPortProbe::new(settings.probe_timeout));
        let launcher = platform_launcher(settings.launch_settings());
        let terminator = platform_terminator();

        Self::with_components(registry, settings, probe, launcher, terminator)
    }

    pub fn with_components(
        registry: Registry,
        settings: OrchestratorSettings,
        probe: Arc<dyn PortProbe>,
        launcher: Arc<dyn ProcessLauncher>,
        terminator: Arc<dyn ProcessTerminator>,
    ) -> Self {
        let slots = registry
            .iter()
            .map(|d| (d.id.clone(), ServiceSlot::new(d.clone())))
            .collect();

        Self {
            registry,
            slots,
            probe,
            launcher,
            terminator,
            settings,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    // =========================================================================
    // Start
    // =========================================================================

    /// Bring `id` online, starting its dependencies first.
    pub async fn start(&self, id: &str) -> ServiceResult<StartOutcome> {
        self.start_with_dependencies(id).await
    }

    /// Start each id in order. One failure does not stop the rest.
    pub async fn start_each<S: AsRef<str>>(&self, ids: &[S]) -> Vec<OperationReport<StartOutcome>> {
        let mut reports = Vec::with_capacity(ids.len());

        for id in ids {
            let id = id.as_ref();
            let result = self.start(id).await;
            let launched = matches!(result, Ok(StartOutcome::Started));
            reports.push(OperationReport::new(id, result));

            if launched && !self.settings.start_delay.is_zero() {
                tokio::time::sleep(self.settings.start_delay).await;
            }
        }

        reports
    }

    /// Start every registered service in registry order.
    pub async fn start_all(&self) -> Vec<OperationReport<StartOutcome>> {
        let ids: Vec<String> = self.registry.ids().map(String::from).collect();
        self.start_each(&ids).await
    }

    // Transition locks are taken dependent-before-dependency; the registry is
    // acyclic so this cannot deadlock.
    fn start_with_dependencies<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, ServiceResult<StartOutcome>> {
        async move {
            let slot = self.slot(id)?;
            let _transition = slot.transition.lock().await;

            if self.is_online(&slot.descriptor).await {
                debug!(service = id, "Already online");
                return Ok(StartOutcome::AlreadyOnline);
            }

            for dependency in &slot.descriptor.depends_on {
                if let Err(source) = self.start_with_dependencies(dependency).await {
                    let err = ServiceError::dependency_failed(id, dependency, source);
                    return Err(self.fail(slot, err).await);
                }
            }

            // dependencies may provide our secondary port
            if !slot.descriptor.depends_on.is_empty() && self.is_online(&slot.descriptor).await {
                return Ok(StartOutcome::AlreadyOnline);
            }

            self.launch_and_wait(slot).await
        }
        .boxed()
    }

    async fn launch_and_wait(&self, slot: &ServiceSlot) -> ServiceResult<StartOutcome> {
        let descriptor = &slot.descriptor;
        let id = descriptor.id.as_str();

        slot.runtime.write().await.begin(Overlay::Starting);
        info!(service = id, command = %descriptor.command_line(), "Starting service");

        let launcher = Arc::clone(&self.launcher);
        let to_launch = descriptor.clone();
        let launched = tokio::task::spawn_blocking(move || launcher.launch(&to_launch)).await;

        let handle = match launched {
            Ok(Ok(handle)) => handle,
            Ok(Err(source)) => return Err(self.fail(slot, ServiceError::launch(id, source)).await),
            Err(e) => {
                let err = ServiceError::internal(id, format!("launch task failed: {e}"));
                return Err(self.fail(slot, err).await);
            }
        };

        let pid = handle.pid();
        slot.runtime.write().await.track(handle);

        let timeout = descriptor
            .startup_timeout
            .unwrap_or(self.settings.startup_timeout);

        if self.wait_until_online(descriptor, timeout).await {
            slot.runtime.write().await.overlay = None;
            info!(service = id, pid, url = %descriptor.url, "Service online");
            Ok(StartOutcome::Started)
        } else {
            // The spawned process is left running; its handle is released
            Err(self.fail(slot, ServiceError::start_timeout(id, timeout)).await)
        }
    }

    // =========================================================================
    // Stop
    // =========================================================================

    /// Stop `id`: graceful termination, then forced termination if the port
    /// is still open after `stop_timeout`. Dependents are left alone.
    pub async fn stop(&self, id: &str) -> ServiceResult<StopOutcome> {
        let slot = self.slot(id)?;
        let _transition = slot.transition.lock().await;
        let port = slot.descriptor.port;

        let mut handle = slot.runtime.write().await.handle.take();
        let tracked = handle.as_mut().is_some_and(ProcessHandle::is_running);

        if !tracked && !self.probe(port).await {
            *slot.runtime.write().await = ServiceRuntimeState::default();
            debug!(service = id, "Already stopped");
            return Ok(StopOutcome::AlreadyStopped);
        }

        slot.runtime.write().await.begin(Overlay::StopRequested);
        info!(service = id, port, tracked, "Stopping service");

        for mode in [StopMode::Graceful, StopMode::Force] {
            let (returned, result) = self.terminate(id, handle, port, mode).await;
            handle = returned;

            match result {
                Ok(outcome) => debug!(service = id, ?mode, ?outcome, "Termination requested"),
                Err(err) if mode == StopMode::Graceful => {
                    warn!(service = id, error = %err, "Graceful termination failed");
                }
                Err(err) => {
                    warn!(service = id, kind = %err.kind(), error = %err, "Stop failed");
                    slot.runtime.write().await.stop_failed(handle, err.kind());
                    return Err(err);
                }
            }

            if self.wait_until_stopped(port, &mut handle).await {
                *slot.runtime.write().await = ServiceRuntimeState::default();
                info!(service = id, "Service stopped");
                return Ok(StopOutcome::Stopped);
            }

            if mode == StopMode::Graceful {
                warn!(service = id, timeout = ?self.settings.stop_timeout, "Service still running, forcing");
            }
        }

        let err = ServiceError::stop_timeout(id, port);
        warn!(service = id, error = %err, "Stop failed");
        slot.runtime.write().await.stop_failed(handle, err.kind());
        Err(err)
    }

    /// Stop each id concurrently. Unordered.
    pub async fn stop_each<S: AsRef<str>>(&self, ids: &[S]) -> Vec<OperationReport<StopOutcome>> {
        join_all(ids.iter().map(|id| async move {
            let id = id.as_ref();
            OperationReport::new(id, self.stop(id).await)
        }))
        .await
    }

    pub async fn stop_all(&self) -> Vec<OperationReport<StopOutcome>> {
        let ids: Vec<String> = self.registry.ids().map(String::from).collect();
        self.stop_each(&ids).await
    }

    /// Teardown: stop every service whose process this orchestrator owns.
    pub async fn shutdown(&self) -> Vec<OperationReport<StopOutcome>> {
        let mut owned = Vec::new();
        for descriptor in self.registry.iter() {
            if let Some(slot) = self.slots.get(&descriptor.id)
                && slot.runtime.read().await.handle.is_some()
            {
                owned.push(descriptor.id.clone());
            }
        }

        info!(count = owned.len(), "Tearing down owned services");
        self.stop_each(&owned).await
    }

    /// Signal through the handle while its process lives, otherwise through
    /// whatever listens on the port.
    async fn terminate(
        &self,
        id: &str,
        handle: Option<ProcessHandle>,
        port: u16,
        mode: StopMode,
    ) -> (Option<ProcessHandle>, ServiceResult<TerminationOutcome>) {
        let terminator = Arc::clone(&self.terminator);

        let joined = tokio::task::spawn_blocking(move || {
            let mut handle = handle;
            let running = handle.as_mut().is_some_and(ProcessHandle::is_running);
            let result = match handle.as_mut() {
                Some(h) if running => terminator.terminate(TerminationTarget::Handle(h), mode),
                _ => terminator.terminate(TerminationTarget::Port(port), mode),
            };
            (handle, result)
        })
        .await;

        match joined {
            Ok((handle, result)) => (handle, result.map_err(|e| ServiceError::termination(id, e))),
            Err(e) => (
                None,
                Err(ServiceError::internal(id, format!("termination task failed: {e}"))),
            ),
        }
    }

    /// Stopped means the port is closed and the tracked process, if any, has
    /// exited.
    async fn wait_until_stopped(&self, port: u16, handle: &mut Option<ProcessHandle>) -> bool {
        let deadline = Instant::now() + self.settings.stop_timeout;

        loop {
            let exited = handle.as_mut().is_none_or(|h| !h.is_running());
            if exited && !self.probe(port).await {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }

    // =========================================================================
    // Status
    // =========================================================================

    pub async fn status(&self, id: &str) -> ServiceResult<ServiceSnapshot> {
        let slot = self.slot(id)?;
        Ok(self.snapshot(slot).await)
    }

    /// Snapshots in registry order.
    pub async fn status_all(&self) -> Vec<ServiceSnapshot> {
        join_all(
            self.registry
                .iter()
                .filter_map(|d| self.slots.get(&d.id))
                .map(|slot| self.snapshot(slot)),
        )
        .await
    }

    async fn snapshot(&self, slot: &ServiceSlot) -> ServiceSnapshot {
        let descriptor = &slot.descriptor;

        // Read lock released before probing
        let (overlay, started_at, pid, last_error) = {
            let runtime = slot.runtime.read().await;
            (
                runtime.overlay,
                runtime.started_at,
                runtime.handle.as_ref().map(ProcessHandle::pid),
                runtime.last_error,
            )
        };

        let status = match overlay {
            Some(overlay) => overlay.into(),
            None if self.is_online(descriptor).await => ServiceStatus::Online,
            None => ServiceStatus::Offline,
        };

        let uptime = match (status, started_at) {
            (ServiceStatus::Online, Some(started)) => (Utc::now() - started).to_std().ok(),
            _ => None,
        };

        ServiceSnapshot {
            id: descriptor.id.clone(),
            name: descriptor.name.clone(),
            status,
            uptime,
            port: descriptor.port,
            url: descriptor.url.clone(),
            pid,
            last_error,
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn slot(&self, id: &str) -> ServiceResult<&ServiceSlot> {
        self.slots
            .get(id)
            .ok_or_else(|| ServiceError::unknown_service(id))
    }

    async fn fail(&self, slot: &ServiceSlot, err: ServiceError) -> ServiceError {
        warn!(service = %slot.descriptor.id, kind = %err.kind(), error = %err, "Start failed");
        slot.runtime.write().await.fail(err.kind());
        err
    }

    async fn probe(&self, port: u16) -> bool {
        let probe = Arc::clone(&self.probe);
        tokio::task::spawn_blocking(move || probe.is_listening(port))
            .await
            .unwrap_or(false)
    }

    async fn is_online(&self, descriptor: &ServiceDescriptor) -> bool {
        for port in descriptor.health_ports() {
            if !self.probe(port).await {
                return false;
            }
        }
        true
    }

    async fn wait_until_online(&self, descriptor: &ServiceDescriptor, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;

        loop {
            if self.is_online(descriptor).await {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }
}
