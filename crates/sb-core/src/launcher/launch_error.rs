use crate::error::ErrorKind;

use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Working directory not found: {} {location}", path.display())]
    PathNotFound {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Setup command '{command}' failed: {reason} {location}")]
    SetupFailed {
        command: String,
        reason: String,
        location: ErrorLocation,
    },

    #[error("Failed to spawn '{command}': {source} {location}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },
}

impl LaunchError {
    #[track_caller]
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::PathNotFound {
            path: path.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn setup_failed(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SetupFailed {
            command: command.into(),
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn spawn_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::SpawnFailed {
            command: command.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PathNotFound { .. } => ErrorKind::PathNotFound,
            Self::SetupFailed { .. } => ErrorKind::SetupFailed,
            Self::SpawnFailed { .. } => ErrorKind::SpawnFailed,
        }
    }
}

pub type LaunchResult<T> = std::result::Result<T, LaunchError>;
