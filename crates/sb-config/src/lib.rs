mod config;
mod error;
mod log_level;
mod logging_config;
mod orchestrator_config;
mod service_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use orchestrator_config::OrchestratorConfig;
pub use service_config::{ServiceConfig, default_services};

pub const CONFIG_DIR_ENV: &str = "SB_CONFIG_DIR";
pub const DEFAULT_CONFIG_DIR: &str = ".switchboard";
pub const CONFIG_FILENAME: &str = "services.toml";

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "logs";
