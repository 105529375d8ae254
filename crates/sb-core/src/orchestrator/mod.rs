mod operation_report;
mod orchestrator_settings;
mod runtime_state;
mod service_orchestrator;
mod service_snapshot;
mod service_status;

pub use operation_report::{OperationReport, StartOutcome, StopOutcome};
pub use orchestrator_settings::OrchestratorSettings;
pub use service_orchestrator::Orchestrator;
pub use service_snapshot::ServiceSnapshot;
pub use service_status::ServiceStatus;
