use crate::launcher::LaunchError;
use crate::registry::RegistryError;
use crate::terminator::TerminationError;

use std::fmt;
use std::panic::Location;
use std::time::Duration;

use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// Flat classification of every failure the orchestrator can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    PathNotFound,
    SetupFailed,
    SpawnFailed,
    StartTimeout,
    DependencyStartFailed,
    TerminationDenied,
    AlreadyStopped,
    StopTimeout,
    UnknownService,
    Internal,
    CyclicDependency,
    DuplicateService,
    UnknownDependency,
    InvalidDescriptor,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Per-service operational error. Always names the service it belongs to.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Unknown service '{service_id}' {location}")]
    UnknownService {
        service_id: String,
        location: ErrorLocation,
    },

    #[error("Service '{service_id}' failed to launch: {source} {location}")]
    Launch {
        service_id: String,
        #[source]
        source: LaunchError,
        location: ErrorLocation,
    },

    #[error("Service '{service_id}' did not come online within {timeout:?} {location}")]
    StartTimeout {
        service_id: String,
        timeout: Duration,
        location: ErrorLocation,
    },

    #[error("Service '{service_id}' not started: dependency '{dependency}' failed {location}")]
    DependencyStartFailed {
        service_id: String,
        dependency: String,
        #[source]
        source: Box<ServiceError>,
        location: ErrorLocation,
    },

    #[error("Service '{service_id}' could not be terminated: {source} {location}")]
    Termination {
        service_id: String,
        #[source]
        source: TerminationError,
        location: ErrorLocation,
    },

    #[error("Service '{service_id}' still listening on port {port} after forced termination {location}")]
    StopTimeout {
        service_id: String,
        port: u16,
        location: ErrorLocation,
    },

    #[error("Service '{service_id}': {message} {location}")]
    Internal {
        service_id: String,
        message: String,
        location: ErrorLocation,
    },
}

impl ServiceError {
    #[track_caller]
    pub fn unknown_service(service_id: impl Into<String>) -> Self {
        Self::UnknownService {
            service_id: service_id.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn launch(service_id: impl Into<String>, source: LaunchError) -> Self {
        Self::Launch {
            service_id: service_id.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn start_timeout(service_id: impl Into<String>, timeout: Duration) -> Self {
        Self::StartTimeout {
            service_id: service_id.into(),
            timeout,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn dependency_failed(
        service_id: impl Into<String>,
        dependency: impl Into<String>,
        source: ServiceError,
    ) -> Self {
        Self::DependencyStartFailed {
            service_id: service_id.into(),
            dependency: dependency.into(),
            source: Box::new(source),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn termination(service_id: impl Into<String>, source: TerminationError) -> Self {
        Self::Termination {
            service_id: service_id.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn stop_timeout(service_id: impl Into<String>, port: u16) -> Self {
        Self::StopTimeout {
            service_id: service_id.into(),
            port,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn internal(service_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Internal {
            service_id: service_id.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownService { .. } => ErrorKind::UnknownService,
            Self::Launch { source, .. } => source.kind(),
            Self::StartTimeout { .. } => ErrorKind::StartTimeout,
            Self::DependencyStartFailed { .. } => ErrorKind::DependencyStartFailed,
            Self::Termination { source, .. } => source.kind(),
            Self::StopTimeout { .. } => ErrorKind::StopTimeout,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub fn service_id(&self) -> &str {
        match self {
            Self::UnknownService { service_id, .. }
            | Self::Launch { service_id, .. }
            | Self::StartTimeout { service_id, .. }
            | Self::DependencyStartFailed { service_id, .. }
            | Self::Termination { service_id, .. }
            | Self::StopTimeout { service_id, .. }
            | Self::Internal { service_id, .. } => service_id,
        }
    }

    /// Name of the failed direct dependency, for `DependencyStartFailed`.
    pub fn dependency(&self) -> Option<&str> {
        match self {
            Self::DependencyStartFailed { dependency, .. } => Some(dependency),
            _ => None,
        }
    }
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CyclicDependency { .. } => ErrorKind::CyclicDependency,
            Self::DuplicateService { .. } => ErrorKind::DuplicateService,
            Self::UnknownDependency { .. } => ErrorKind::UnknownDependency,
            Self::InvalidDescriptor { .. } => ErrorKind::InvalidDescriptor,
            Self::UnknownService { .. } => ErrorKind::UnknownService,
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
