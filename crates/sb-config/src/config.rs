use crate::{
    CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigError, ConfigErrorResult, DEFAULT_CONFIG_DIR,
    LoggingConfig, OrchestratorConfig, ServiceConfig, default_services,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub orchestrator: OrchestratorConfig,
    pub logging: LoggingConfig,
    pub services: Vec<ServiceConfig>,
    /// Directory the config was loaded from; relative paths resolve against it
    #[serde(skip)]
    pub config_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            orchestrator: OrchestratorConfig::default(),
            logging: LoggingConfig::default(),
            services: default_services(),
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
        }
    }
}

impl Config {
    /// Load config from the default config directory.
    ///
    /// Loading order:
    /// 1. Check for SB_CONFIG_DIR env var, else use ./.switchboard/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load services.toml if it exists, else use defaults
    /// 4. Apply SB_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;
        Self::load_from(&config_dir)
    }

    /// Load config from an explicit directory (same rules as [`Config::load`]).
    pub fn load_from(config_dir: &Path) -> ConfigErrorResult<Self> {
        if !config_dir.exists() {
            std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.to_path_buf(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.config_dir = config_dir.to_path_buf();
        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: SB_CONFIG_DIR env var > ./.switchboard/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.orchestrator.validate()?;
        self.logging.validate()?;

        if self.services.is_empty() {
            return Err(ConfigError::config("at least one [[services]] entry is required"));
        }

        for service in &self.services {
            service.validate()?;
        }

        for id in &self.orchestrator.auto_start {
            if !self.services.iter().any(|s| &s.id == id) {
                return Err(ConfigError::orchestrator(format!(
                    "orchestrator.auto_start names unknown service '{id}'"
                )));
            }
        }

        Ok(())
    }

    /// Project root: the parent of the config directory.
    pub fn root_dir(&self) -> PathBuf {
        match self.config_dir.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Resolve a service working directory against the project root.
    pub fn resolve_working_dir(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_dir().join(path)
        }
    }

    /// Get absolute path to the log directory.
    pub fn log_dir(&self) -> PathBuf {
        self.config_dir.join(&self.logging.dir)
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded from {}", self.config_dir.display());
        info!(
            "  orchestrator: startup={}s, stop={}s, probe={}ms, poll={}ms",
            self.orchestrator.startup_timeout_secs,
            self.orchestrator.stop_timeout_secs,
            self.orchestrator.probe_timeout_ms,
            self.orchestrator.poll_interval_ms
        );
        info!(
            "  setup: timeout={}s, start_delay={}ms",
            self.orchestrator.setup_timeout_secs, self.orchestrator.start_delay_ms
        );
        info!(
            "  logging: {} (dir: {}, file: {}, colored: {})",
            *self.logging.level, self.logging.dir, self.logging.file, self.logging.colored
        );

        for service in &self.services {
            info!(
                "  service {}: port {}{} in {} (deps: [{}])",
                service.id,
                service.port,
                service
                    .secondary_port
                    .map(|p| format!("+{p}"))
                    .unwrap_or_default(),
                service.working_dir.display(),
                service.depends_on.join(", ")
            );
        }
    }

    fn apply_env_overrides(&mut self) {
        // Orchestrator
        Self::apply_env_parse(
            "SB_STARTUP_TIMEOUT_SECS",
            &mut self.orchestrator.startup_timeout_secs,
        );
        Self::apply_env_parse(
            "SB_STOP_TIMEOUT_SECS",
            &mut self.orchestrator.stop_timeout_secs,
        );
        Self::apply_env_parse(
            "SB_PROBE_TIMEOUT_MS",
            &mut self.orchestrator.probe_timeout_ms,
        );
        Self::apply_env_parse(
            "SB_POLL_INTERVAL_MS",
            &mut self.orchestrator.poll_interval_ms,
        );
        Self::apply_env_parse("SB_START_DELAY_MS", &mut self.orchestrator.start_delay_ms);
        Self::apply_env_parse(
            "SB_SETUP_TIMEOUT_SECS",
            &mut self.orchestrator.setup_timeout_secs,
        );

        // Logging
        Self::apply_env_parse("SB_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_string("SB_LOG_DIR", &mut self.logging.dir);
        Self::apply_env_bool("SB_LOG_FILE", &mut self.logging.file);
        Self::apply_env_bool("SB_LOG_COLORED", &mut self.logging.colored);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }
}
