use crate::error::ErrorKind;
use crate::orchestrator::ServiceStatus;

use std::time::Duration;

use serde::Serialize;

/// Point-in-time view of one service, as returned by status queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSnapshot {
    pub id: String,
    pub name: String,
    pub status: ServiceStatus,
    /// Only while online and started by this orchestrator
    #[serde(rename = "uptime_secs", serialize_with = "serialize_secs")]
    pub uptime: Option<Duration>,
    pub port: u16,
    pub url: String,
    pub pid: Option<u32>,
    pub last_error: Option<ErrorKind>,
}

impl ServiceSnapshot {
    pub fn is_online(&self) -> bool {
        self.status == ServiceStatus::Online
    }
}

fn serialize_secs<S: serde::Serializer>(
    value: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(d) => serializer.serialize_some(&d.as_secs()),
        None => serializer.serialize_none(),
    }
}
