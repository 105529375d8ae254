use crate::launcher::LaunchSettings;

use std::path::PathBuf;
use std::time::Duration;

use sb_config::{Config, OrchestratorConfig};

/// Timing and output settings the orchestrator runs with.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub startup_timeout: Duration,
    /// Bound on each of the graceful and forced stop phases
    pub stop_timeout: Duration,
    pub probe_timeout: Duration,
    pub poll_interval: Duration,
    /// Pause after each launch in `start_all`
    pub start_delay: Duration,
    pub setup_timeout: Duration,
    pub log_dir: Option<PathBuf>,
}

impl OrchestratorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            log_dir: Some(config.log_dir()),
            ..Self::from_orchestrator(&config.orchestrator)
        }
    }

    fn from_orchestrator(orchestrator: &OrchestratorConfig) -> Self {
        Self {
            startup_timeout: orchestrator.startup_timeout(),
            stop_timeout: orchestrator.stop_timeout(),
            probe_timeout: orchestrator.probe_timeout(),
            poll_interval: orchestrator.poll_interval(),
            start_delay: orchestrator.start_delay(),
            setup_timeout: orchestrator.setup_timeout(),
            log_dir: None,
        }
    }

    pub fn launch_settings(&self) -> LaunchSettings {
        LaunchSettings {
            log_dir: self.log_dir.clone(),
            setup_timeout: self.setup_timeout,
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from_orchestrator(&OrchestratorConfig::default())
    }
}
