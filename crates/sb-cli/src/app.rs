//! Command dispatch.

use crate::cli::Cli;
use crate::commands::Commands;
use crate::logging::setup_logging;
use crate::output::{self, OutputFormat, PlanView, ReportView, ServiceView};
use crate::signals;

use sb_config::Config;
use sb_core::{OperationReport, Orchestrator, OrchestratorSettings, Registry, ServiceSnapshot};

use std::fmt::Display;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

/// A per-service operation failed.
pub const EXIT_OPERATION_FAILED: u8 = 1;
/// Configuration or registry could not be loaded.
pub const EXIT_CONFIG_ERROR: u8 = 2;

pub async fn run(cli: Cli) -> ExitCode {
    let format = cli.output_format();

    let config = match load_config(cli.config_dir.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", output::error_chain(e.as_ref()));
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    if let Err(e) = setup_logging(&config.logging, &config.log_dir()) {
        eprintln!("Warning: logging setup failed: {e}");
    }

    let registry = match Registry::from_config(&config) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let orchestrator = Orchestrator::new(registry, OrchestratorSettings::from_config(&config));

    match cli.command {
        Commands::List => list(&orchestrator, format),
        Commands::Plan { id } => plan(&orchestrator, &id, format),
        Commands::Url { id } => url(&orchestrator, &id, format),
        Commands::Status { id } => status(&orchestrator, id.as_deref(), format).await,
        Commands::Start { ids, all } => {
            let reports = if all {
                orchestrator.start_all().await
            } else {
                orchestrator.start_each(&ids).await
            };
            finish(&reports, format)
        }
        Commands::Stop { ids, all } => {
            let reports = if all {
                orchestrator.stop_all().await
            } else {
                orchestrator.stop_each(&ids).await
            };
            finish(&reports, format)
        }
        Commands::Up { ids, interval } => up(&orchestrator, &config, ids, interval, format).await,
    }
}

fn load_config(dir: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match dir {
        Some(dir) => Config::load_from(dir)?,
        None => Config::load()?,
    };
    config.validate()?;
    Ok(config)
}

// =========================================================================
// Registry queries
// =========================================================================

fn list(orchestrator: &Orchestrator, format: OutputFormat) -> ExitCode {
    let registry = orchestrator.registry();
    let views: Vec<ServiceView> = registry.iter().map(ServiceView::from).collect();
    emit(format, &views, || output::services_table(registry))
}

fn plan(orchestrator: &Orchestrator, id: &str, format: OutputFormat) -> ExitCode {
    let registry = orchestrator.registry();
    match registry.startup_order(id) {
        Ok(order) => {
            let dependents = registry.dependents(id);
            let view = PlanView::new(&order, &dependents);
            emit(format, &view, || output::plan_lines(&order, &dependents))
        }
        Err(e) => fail(e),
    }
}

fn url(orchestrator: &Orchestrator, id: &str, format: OutputFormat) -> ExitCode {
    match orchestrator.registry().get(id) {
        Some(descriptor) => emit(format, &descriptor.url, || descriptor.url.clone()),
        None => fail(format!("Unknown service '{id}'")),
    }
}

// =========================================================================
// Lifecycle
// =========================================================================

async fn status(orchestrator: &Orchestrator, id: Option<&str>, format: OutputFormat) -> ExitCode {
    match id {
        Some(id) => match orchestrator.status(id).await {
            Ok(snapshot) => emit(format, &snapshot, || {
                output::status_table(std::slice::from_ref(&snapshot))
            }),
            Err(e) => fail(output::error_chain(&e)),
        },
        None => {
            let snapshots = orchestrator.status_all().await;
            emit(format, &snapshots, || output::status_table(&snapshots))
        }
    }
}

/// Start, watch until asked to stop, then tear down what was started.
async fn up(
    orchestrator: &Orchestrator,
    config: &Config,
    ids: Vec<String>,
    interval: Duration,
    format: OutputFormat,
) -> ExitCode {
    config.log_summary();

    let targets = if !ids.is_empty() {
        ids
    } else if !config.orchestrator.auto_start.is_empty() {
        config.orchestrator.auto_start.clone()
    } else {
        orchestrator.registry().ids().map(String::from).collect()
    };

    // Registered before starting so an early Ctrl+C still tears down
    let mut shutdown = signals::shutdown_requested();

    let started = orchestrator.start_each(&targets).await;
    print_reports(&started, format);
    let mut failed = started.iter().any(|r| !r.is_ok());

    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            signal = &mut shutdown => {
                info!("Received {}, stopping services", signal.unwrap_or("shutdown"));
                break;
            }
            _ = ticker.tick() => {
                let snapshots = orchestrator.status_all().await;
                print_status(&snapshots, format);
            }
        }
    }

    let stopped = orchestrator.shutdown().await;
    print_reports(&stopped, format);
    failed |= stopped.iter().any(|r| !r.is_ok());

    exit_code(failed)
}

// =========================================================================
// Output helpers
// =========================================================================

fn emit<T: Serialize + ?Sized>(
    format: OutputFormat,
    value: &T,
    table: impl FnOnce() -> String,
) -> ExitCode {
    match format {
        OutputFormat::Table => {
            println!("{}", table());
            ExitCode::SUCCESS
        }
        OutputFormat::Json { pretty } => match output::to_json(value, pretty) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error serializing output: {e}");
                ExitCode::FAILURE
            }
        },
    }
}

fn print_reports<T: Display>(reports: &[OperationReport<T>], format: OutputFormat) {
    let views: Vec<ReportView> = reports.iter().map(ReportView::from_report).collect();
    emit(format, &views, || output::report_lines(reports));
}

fn print_status(snapshots: &[ServiceSnapshot], format: OutputFormat) {
    emit(format, snapshots, || output::status_table(snapshots));
}

fn finish<T: Display>(reports: &[OperationReport<T>], format: OutputFormat) -> ExitCode {
    print_reports(reports, format);
    exit_code(reports.iter().any(|r| !r.is_ok()))
}

fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::from(EXIT_OPERATION_FAILED)
    } else {
        ExitCode::SUCCESS
    }
}

fn fail(message: impl Display) -> ExitCode {
    eprintln!("Error: {message}");
    ExitCode::from(EXIT_OPERATION_FAILED)
}
