use crate::error::ErrorKind;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerminationError {
    #[error("Termination of pid {pid} refused: {reason} {location}")]
    TerminationDenied {
        pid: u32,
        reason: String,
        location: ErrorLocation,
    },

    #[error("Port {port} is held by a process whose owner cannot be read {location}")]
    OwnerUnreadable { port: u16, location: ErrorLocation },

    #[error("Cannot list listeners on port {port}: {reason} {location}")]
    Enumeration {
        port: u16,
        reason: String,
        location: ErrorLocation,
    },
}

impl TerminationError {
    #[track_caller]
    pub fn denied(pid: u32, reason: impl Into<String>) -> Self {
        Self::TerminationDenied {
            pid,
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn owner_unreadable(port: u16) -> Self {
        Self::OwnerUnreadable {
            port,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn enumeration(port: u16, reason: impl Into<String>) -> Self {
        Self::Enumeration {
            port,
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TerminationDenied { .. } | Self::OwnerUnreadable { .. } => {
                ErrorKind::TerminationDenied
            }
            Self::Enumeration { .. } => ErrorKind::Internal,
        }
    }
}

pub type TerminationResult<T> = std::result::Result<T, TerminationError>;
