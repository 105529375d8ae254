//! Logging setup with optional file rotation.

use sb_config::LoggingConfig;

use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

const LOG_FILE_PREFIX: &str = "switchboard";
const MAX_LOG_FILES: usize = 7;

/// Install the global subscriber.
///
/// # Log Layers
/// - Console: human-readable, on stderr so stdout stays parseable
/// - File (when `logging.file`): plain text, daily rotation, 7 files kept
///
/// `RUST_LOG` overrides the configured level. Records emitted through the
/// `log` crate are forwarded.
pub fn setup_logging(
    config: &LoggingConfig,
    log_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(config.colored)
        .with_writer(std::io::stderr);

    let file_layer = if config.file {
        std::fs::create_dir_all(log_dir)?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .max_log_files(MAX_LOG_FILES)
            .filename_prefix(LOG_FILE_PREFIX)
            .filename_suffix("log")
            .build(log_dir)?;

        Some(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .with_writer(file_appender),
        )
    } else {
        None
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}
