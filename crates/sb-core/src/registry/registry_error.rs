use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Load-time configuration errors. Any of these aborts orchestrator startup;
/// a partially valid registry is never constructed.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Cyclic dependency: {} {location}", cycle.join(" -> "))]
    CyclicDependency {
        cycle: Vec<String>,
        location: ErrorLocation,
    },

    #[error("Service '{id}' is declared more than once {location}")]
    DuplicateService { id: String, location: ErrorLocation },

    #[error("Service '{service}' depends on unknown service '{dependency}' {location}")]
    UnknownDependency {
        service: String,
        dependency: String,
        location: ErrorLocation,
    },

    #[error("Service '{service}' is invalid: {message} {location}")]
    InvalidDescriptor {
        service: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Unknown service '{id}' {location}")]
    UnknownService { id: String, location: ErrorLocation },
}

impl RegistryError {
    #[track_caller]
    pub fn cyclic(cycle: Vec<String>) -> Self {
        Self::CyclicDependency {
            cycle,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateService {
            id: id.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unknown_dependency(service: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::UnknownDependency {
            service: service.into(),
            dependency: dependency.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            service: service.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unknown_service(id: impl Into<String>) -> Self {
        Self::UnknownService {
            id: id.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
