//! Human and JSON rendering of command results.

use sb_core::{ErrorKind, OperationReport, Registry, ServiceDescriptor, ServiceSnapshot};

use std::error::Error;
use std::fmt::Display;
use std::time::Duration;

use serde::Serialize;

const NONE: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Table,
    Json { pretty: bool },
}

/// `Xh Ym`, minutes truncated.
pub(crate) fn format_uptime(uptime: Duration) -> String {
    let minutes = uptime.as_secs() / 60;
    format!("{}h {}m", minutes / 60, minutes % 60)
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

/// Error message followed by its sources, `: `-separated. Sources already
/// interpolated into an outer message are not repeated.
pub(crate) fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}

// =========================================================================
// Tables
// =========================================================================

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(headers.to_vec())];
    lines.extend(
        rows.iter()
            .map(|row| format_row(row.iter().map(String::as_str).collect())),
    );
    lines.join("\n")
}

pub(crate) fn status_table(snapshots: &[ServiceSnapshot]) -> String {
    let rows: Vec<Vec<String>> = snapshots
        .iter()
        .map(|s| {
            vec![
                s.id.clone(),
                s.name.clone(),
                s.status.to_string(),
                s.port.to_string(),
                s.uptime.map(format_uptime).unwrap_or_else(|| NONE.into()),
                s.pid.map(|p| p.to_string()).unwrap_or_else(|| NONE.into()),
                s.url.clone(),
                s.last_error
                    .map(|k| k.to_string())
                    .unwrap_or_else(|| NONE.into()),
            ]
        })
        .collect();

    render_table(
        &["ID", "NAME", "STATUS", "PORT", "UPTIME", "PID", "URL", "LAST ERROR"],
        &rows,
    )
}

pub(crate) fn services_table(registry: &Registry) -> String {
    let rows: Vec<Vec<String>> = registry
        .iter()
        .map(|d| {
            let ports = match d.secondary_port {
                Some(secondary) => format!("{}+{secondary}", d.port),
                None => d.port.to_string(),
            };
            let deps = if d.depends_on.is_empty() {
                NONE.to_string()
            } else {
                d.depends_on.join(",")
            };
            vec![d.id.clone(), d.name.clone(), ports, deps, d.command_line()]
        })
        .collect();

    render_table(&["ID", "NAME", "PORTS", "DEPENDS ON", "COMMAND"], &rows)
}

/// Numbered startup order, then the services that would be left without
/// this one if it stopped.
pub(crate) fn plan_lines(
    order: &[&ServiceDescriptor],
    dependents: &[&ServiceDescriptor],
) -> String {
    let mut lines: Vec<String> = order
        .iter()
        .enumerate()
        .map(|(i, d)| format!("{}. {} (port {})", i + 1, d.id, d.port))
        .collect();

    if !dependents.is_empty() {
        let ids: Vec<&str> = dependents.iter().map(|d| d.id.as_str()).collect();
        lines.push(format!("Required by: {}", ids.join(", ")));
    }

    lines.join("\n")
}

pub(crate) fn report_lines<T: Display>(reports: &[OperationReport<T>]) -> String {
    reports
        .iter()
        .map(|r| match &r.result {
            Ok(outcome) => format!("{}: {outcome}", r.service_id),
            Err(e) => format!("{}: {} ({})", r.service_id, error_chain(e), e.kind()),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// =========================================================================
// JSON views
// =========================================================================

#[derive(Debug, Serialize)]
pub(crate) struct ReportView {
    pub service_id: String,
    pub ok: bool,
    pub outcome: Option<String>,
    pub error_kind: Option<ErrorKind>,
    pub error: Option<String>,
}

impl ReportView {
    pub(crate) fn from_report<T: Display>(report: &OperationReport<T>) -> Self {
        match &report.result {
            Ok(outcome) => Self {
                service_id: report.service_id.clone(),
                ok: true,
                outcome: Some(outcome.to_string()),
                error_kind: None,
                error: None,
            },
            Err(e) => Self {
                service_id: report.service_id.clone(),
                ok: false,
                outcome: None,
                error_kind: Some(e.kind()),
                error: Some(error_chain(e)),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PlanView<'a> {
    pub order: Vec<&'a str>,
    pub required_by: Vec<&'a str>,
}

impl<'a> PlanView<'a> {
    pub fn new(order: &[&'a ServiceDescriptor], dependents: &[&'a ServiceDescriptor]) -> Self {
        Self {
            order: order.iter().map(|d| d.id.as_str()).collect(),
            required_by: dependents.iter().map(|d| d.id.as_str()).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ServiceView<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub command: &'a [String],
    pub working_dir: String,
    pub port: u16,
    pub secondary_port: Option<u16>,
    pub depends_on: &'a [String],
    pub url: &'a str,
}

impl<'a> From<&'a ServiceDescriptor> for ServiceView<'a> {
    fn from(d: &'a ServiceDescriptor) -> Self {
        Self {
            id: &d.id,
            name: &d.name,
            description: &d.description,
            command: &d.command,
            working_dir: d.working_dir.display().to_string(),
            port: d.port,
            secondary_port: d.secondary_port,
            depends_on: &d.depends_on,
            url: &d.url,
        }
    }
}
