use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

// Startup constraints
pub const MIN_STARTUP_TIMEOUT_SECS: u64 = 1;
pub const MAX_STARTUP_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_STARTUP_TIMEOUT_SECS: u64 = 30;

pub const MIN_STOP_TIMEOUT_SECS: u64 = 1;
pub const MAX_STOP_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_STOP_TIMEOUT_SECS: u64 = 10;

// Probe constraints
pub const MIN_PROBE_TIMEOUT_MS: u64 = 50;
pub const MAX_PROBE_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 1000;

pub const MIN_POLL_INTERVAL_MS: u64 = 10;
pub const MAX_POLL_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

pub const MAX_START_DELAY_MS: u64 = 60_000;
pub const DEFAULT_START_DELAY_MS: u64 = 0;

pub const MIN_SETUP_TIMEOUT_SECS: u64 = 1;
pub const MAX_SETUP_TIMEOUT_SECS: u64 = 3600;
pub const DEFAULT_SETUP_TIMEOUT_SECS: u64 = 300;

/// Timing knobs for the lifecycle orchestrator.
///
/// Every blocking step of a start or stop is bounded by one of these,
/// so a hung service can never stall the orchestrator indefinitely.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// How long a launched service may take to open its port(s)
    pub startup_timeout_secs: u64,
    /// How long each stop phase (graceful, then forced) waits for the port to close
    pub stop_timeout_secs: u64,
    /// Upper bound for a single TCP connect probe
    pub probe_timeout_ms: u64,
    /// Delay between probes while waiting for a port to open or close
    pub poll_interval_ms: u64,
    /// Pause between services during start-all
    pub start_delay_ms: u64,
    /// Upper bound for a one-time setup command
    pub setup_timeout_secs: u64,
    /// Services brought up by `sb up` when none are named (empty = all)
    pub auto_start: Vec<String>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            startup_timeout_secs: DEFAULT_STARTUP_TIMEOUT_SECS,
            stop_timeout_secs: DEFAULT_STOP_TIMEOUT_SECS,
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            start_delay_ms: DEFAULT_START_DELAY_MS,
            setup_timeout_secs: DEFAULT_SETUP_TIMEOUT_SECS,
            auto_start: Vec::new(),
        }
    }
}

impl OrchestratorConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        Self::check_range(
            "startup_timeout_secs",
            self.startup_timeout_secs,
            MIN_STARTUP_TIMEOUT_SECS,
            MAX_STARTUP_TIMEOUT_SECS,
        )?;
        Self::check_range(
            "stop_timeout_secs",
            self.stop_timeout_secs,
            MIN_STOP_TIMEOUT_SECS,
            MAX_STOP_TIMEOUT_SECS,
        )?;
        Self::check_range(
            "probe_timeout_ms",
            self.probe_timeout_ms,
            MIN_PROBE_TIMEOUT_MS,
            MAX_PROBE_TIMEOUT_MS,
        )?;
        Self::check_range(
            "poll_interval_ms",
            self.poll_interval_ms,
            MIN_POLL_INTERVAL_MS,
            MAX_POLL_INTERVAL_MS,
        )?;
        Self::check_range("start_delay_ms", self.start_delay_ms, 0, MAX_START_DELAY_MS)?;
        Self::check_range(
            "setup_timeout_secs",
            self.setup_timeout_secs,
            MIN_SETUP_TIMEOUT_SECS,
            MAX_SETUP_TIMEOUT_SECS,
        )?;

        Ok(())
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn setup_timeout(&self) -> Duration {
        Duration::from_secs(self.setup_timeout_secs)
    }

    fn check_range(field: &str, value: u64, min: u64, max: u64) -> ConfigErrorResult<()> {
        if value < min || value > max {
            return Err(ConfigError::orchestrator(format!(
                "orchestrator.{field} must be {min}-{max}, got {value}"
            )));
        }
        Ok(())
    }
}
