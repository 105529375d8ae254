#![allow(dead_code, unused_imports)]

pub(crate) mod fake_launcher;
pub(crate) mod fake_terminator;
pub(crate) mod listeners;

pub use fake_launcher::*;
pub use fake_terminator::*;
pub use listeners::*;

use sb_core::{
    Orchestrator, OrchestratorSettings, Registry, ServiceDescriptor, TcpPortProbe,
};

use std::sync::Arc;
use std::time::Duration;

/// Fast timings so failure paths finish quickly.
pub fn test_settings() -> OrchestratorSettings {
    OrchestratorSettings {
        startup_timeout: Duration::from_secs(3),
        stop_timeout: Duration::from_millis(500),
        probe_timeout: Duration::from_millis(200),
        poll_interval: Duration::from_millis(20),
        start_delay: Duration::ZERO,
        setup_timeout: Duration::from_secs(5),
        log_dir: None,
    }
}

pub fn service(id: &str, port: u16, deps: &[&str]) -> ServiceDescriptor {
    ServiceDescriptor::new(id, vec!["fake-service".into()], ".", port).with_dependencies(deps)
}

/// Orchestrator wired to fakes sharing one listener table, probed for real.
pub struct TestHarness {
    pub orchestrator: Arc<Orchestrator>,
    pub launcher: Arc<FakeLauncher>,
    pub terminator: Arc<FakeTerminator>,
    pub listeners: Listeners,
}

impl TestHarness {
    pub fn new(services: Vec<ServiceDescriptor>) -> Self {
        Self::with_settings(services, test_settings())
    }

    pub fn with_settings(services: Vec<ServiceDescriptor>, settings: OrchestratorSettings) -> Self {
        let listeners = Listeners::default();
        let launcher = Arc::new(FakeLauncher::new(listeners.clone()));
        let terminator = Arc::new(FakeTerminator::new(listeners.clone()));
        let probe = Arc::new(TcpPortProbe::new(settings.probe_timeout));
        let registry = Registry::new(services).unwrap();

        let orchestrator = Arc::new(Orchestrator::with_components(
            registry,
            settings,
            probe,
            launcher.clone(),
            terminator.clone(),
        ));

        Self {
            orchestrator,
            launcher,
            terminator,
            listeners,
        }
    }
}
