use crate::orchestrator_config::{MAX_STARTUP_TIMEOUT_SECS, MIN_STARTUP_TIMEOUT_SECS};
use crate::{ConfigError, ConfigErrorResult};

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// One `[[services]]` entry as written in `services.toml`.
///
/// Field-level sanity is checked by [`ServiceConfig::validate`]. Checks that
/// span services (unique ids, dependency references, cycles) belong to the
/// registry built from these entries.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServiceConfig {
    pub id: String,
    /// Display name (falls back to the id)
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Argument vector; the first element is the program
    pub command: Vec<String>,
    /// Directory the command runs from, relative to the project root
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,
    pub port: u16,
    /// Backing listener that must also accept connections before the service counts as online
    #[serde(default)]
    pub secondary_port: Option<u16>,
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// One-time command (e.g. dependency installation) run before launch
    #[serde(default)]
    pub setup_command: Option<Vec<String>>,
    /// Path, relative to `working_dir`, whose presence means setup already ran
    #[serde(default)]
    pub setup_marker: Option<PathBuf>,
    /// Reported URL; defaults to `http://localhost:<port>`
    #[serde(default)]
    pub url: Option<String>,
    /// Per-service override of `orchestrator.startup_timeout_secs`
    #[serde(default)]
    pub startup_timeout_secs: Option<u64>,
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

impl ServiceConfig {
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    pub fn url(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::service("services.id cannot be empty"));
        }

        if !self
            .id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::service(format!(
                "services.id '{}' may only contain letters, digits, '-' and '_'",
                self.id
            )));
        }

        if self.command.first().is_none_or(|program| program.trim().is_empty()) {
            return Err(ConfigError::service(format!(
                "service '{}': command must name a program",
                self.id
            )));
        }

        if self.port == 0 {
            return Err(ConfigError::service(format!(
                "service '{}': port must be 1-65535",
                self.id
            )));
        }

        if let Some(secondary) = self.secondary_port {
            if secondary == 0 {
                return Err(ConfigError::service(format!(
                    "service '{}': secondary_port must be 1-65535",
                    self.id
                )));
            }
            if secondary == self.port {
                return Err(ConfigError::service(format!(
                    "service '{}': secondary_port must differ from port {}",
                    self.id, self.port
                )));
            }
        }

        if let Some(setup) = &self.setup_command
            && setup.first().is_none_or(|program| program.trim().is_empty())
        {
            return Err(ConfigError::service(format!(
                "service '{}': setup_command must name a program",
                self.id
            )));
        }

        if let Some(marker) = &self.setup_marker {
            if self.setup_command.is_none() {
                return Err(ConfigError::service(format!(
                    "service '{}': setup_marker requires setup_command",
                    self.id
                )));
            }
            if marker.is_absolute() || Self::has_parent_component(marker) {
                return Err(ConfigError::service(format!(
                    "service '{}': setup_marker must be relative and cannot contain '..'",
                    self.id
                )));
            }
        }

        if let Some(timeout) = self.startup_timeout_secs
            && !(MIN_STARTUP_TIMEOUT_SECS..=MAX_STARTUP_TIMEOUT_SECS).contains(&timeout)
        {
            return Err(ConfigError::service(format!(
                "service '{}': startup_timeout_secs must be {}-{}, got {}",
                self.id, MIN_STARTUP_TIMEOUT_SECS, MAX_STARTUP_TIMEOUT_SECS, timeout
            )));
        }

        Ok(())
    }

    fn has_parent_component(path: &Path) -> bool {
        path.components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
    }
}

/// The platform's stock service set, used when no `services.toml` exists.
pub fn default_services() -> Vec<ServiceConfig> {
    vec![
        ServiceConfig {
            id: "call-api".into(),
            name: "Call Metrics API".into(),
            description: "Backend API for call center metrics".into(),
            command: argv(&["python", "main.py"]),
            working_dir: PathBuf::from("Call-System"),
            port: 8000,
            secondary_port: None,
            depends_on: Vec::new(),
            setup_command: None,
            setup_marker: None,
            url: None,
            startup_timeout_secs: None,
        },
        ServiceConfig {
            id: "email".into(),
            name: "Email Assistant".into(),
            description: "E-mail response assistant with smart templates".into(),
            command: argv(&["streamlit", "run", "email_assistant.py"]),
            working_dir: PathBuf::from("Email-Assistant"),
            port: 8501,
            secondary_port: None,
            depends_on: Vec::new(),
            setup_command: None,
            setup_marker: None,
            url: None,
            startup_timeout_secs: None,
        },
        ServiceConfig {
            id: "call-dashboard".into(),
            name: "Call Metrics Dashboard".into(),
            description: "Real-time call center analytics dashboard".into(),
            command: argv(&["streamlit", "run", "dashboard.py", "--server.port", "8502"]),
            working_dir: PathBuf::from("Call-System"),
            port: 8502,
            secondary_port: Some(8000),
            depends_on: vec!["call-api".into()],
            setup_command: None,
            setup_marker: None,
            url: None,
            startup_timeout_secs: None,
        },
        ServiceConfig {
            id: "crm".into(),
            name: "CRM Integration".into(),
            description: "HubSpot CRM integration prototype".into(),
            command: argv(&["npm", "start"]),
            working_dir: PathBuf::from("crm-integration-prototype"),
            port: 3000,
            secondary_port: None,
            depends_on: Vec::new(),
            setup_command: Some(argv(&["npm", "install"])),
            setup_marker: Some(PathBuf::from("node_modules")),
            url: None,
            startup_timeout_secs: Some(120),
        },
    ]
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
