use sb_config::{Config, ServiceConfig};

use std::path::PathBuf;
use std::time::Duration;

/// One-time preparation run before the first launch of a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupStep {
    pub command: Vec<String>,
    /// Relative to the service working directory. When present, setup is
    /// skipped if this path exists; when absent, setup runs before every launch.
    pub marker: Option<PathBuf>,
}

/// Immutable description of a launchable service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub command: Vec<String>,
    pub working_dir: PathBuf,
    pub port: u16,
    pub secondary_port: Option<u16>,
    pub depends_on: Vec<String>,
    pub setup: Option<SetupStep>,
    pub url: String,
    pub startup_timeout: Option<Duration>,
}

impl ServiceDescriptor {
    /// Minimal descriptor; callers fill in the optional parts.
    pub fn new(
        id: impl Into<String>,
        command: Vec<String>,
        working_dir: impl Into<PathBuf>,
        port: u16,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            command,
            working_dir: working_dir.into(),
            port,
            secondary_port: None,
            depends_on: Vec::new(),
            setup: None,
            url: format!("http://localhost:{port}"),
            startup_timeout: None,
        }
    }

    pub fn with_dependencies(mut self, depends_on: &[&str]) -> Self {
        self.depends_on = depends_on.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_secondary_port(mut self, port: u16) -> Self {
        self.secondary_port = Some(port);
        self
    }

    pub fn with_setup(mut self, command: Vec<String>, marker: Option<PathBuf>) -> Self {
        self.setup = Some(SetupStep { command, marker });
        self
    }

    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = Some(timeout);
        self
    }

    /// Build from a config entry, resolving the working directory against the
    /// project root.
    pub fn from_config(service: &ServiceConfig, config: &Config) -> Self {
        Self {
            id: service.id.clone(),
            name: service.display_name().to_string(),
            description: service.description.clone(),
            command: service.command.clone(),
            working_dir: config.resolve_working_dir(&service.working_dir),
            port: service.port,
            secondary_port: service.secondary_port,
            depends_on: service.depends_on.clone(),
            setup: service.setup_command.as_ref().map(|command| SetupStep {
                command: command.clone(),
                marker: service.setup_marker.clone(),
            }),
            url: service.url(),
            startup_timeout: service.startup_timeout_secs.map(Duration::from_secs),
        }
    }

    /// Every port that must accept connections for the service to be online.
    pub fn health_ports(&self) -> Vec<u16> {
        std::iter::once(self.port).chain(self.secondary_port).collect()
    }

    /// Human-readable command line, for logs only.
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}
