//! Local service lifecycle orchestration: registry, port probe, detached
//! process launch, termination by handle or port, and the per-service state
//! machine that ties them together.

pub mod error;
pub mod launcher;
pub mod orchestrator;
pub mod probe;
pub mod registry;
pub mod terminator;

#[cfg(test)]
mod tests;

pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use launcher::{LaunchError, LaunchSettings, ProcessHandle, ProcessLauncher};
pub use orchestrator::{
    OperationReport, Orchestrator, OrchestratorSettings, ServiceSnapshot, ServiceStatus,
    StartOutcome, StopOutcome,
};
pub use probe::{PortProbe, TcpPortProbe};
pub use registry::{Registry, RegistryError, RegistryResult, ServiceDescriptor, SetupStep};
pub use terminator::{
    ProcessTerminator, StopMode, TerminationError, TerminationOutcome, TerminationTarget,
};
