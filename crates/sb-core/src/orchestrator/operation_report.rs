use crate::error::ServiceResult;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyOnline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    AlreadyStopped,
}

impl fmt::Display for StartOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "started"),
            Self::AlreadyOnline => write!(f, "already online"),
        }
    }
}

impl fmt::Display for StopOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::AlreadyStopped => write!(f, "already stopped"),
        }
    }
}

/// Result of one service's part in a bulk operation.
#[derive(Debug)]
pub struct OperationReport<T> {
    pub service_id: String,
    pub result: ServiceResult<T>,
}

impl<T> OperationReport<T> {
    pub fn new(service_id: impl Into<String>, result: ServiceResult<T>) -> Self {
        Self {
            service_id: service_id.into(),
            result,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}
