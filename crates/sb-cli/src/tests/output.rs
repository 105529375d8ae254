use crate::output::{
    PlanView, ReportView, error_chain, format_uptime, plan_lines, report_lines, services_table,
    status_table, to_json,
};

use sb_core::{
    ErrorKind, LaunchError, OperationReport, Registry, ServiceDescriptor, ServiceError, ServiceSnapshot,
    ServiceStatus, StartOutcome,
};

use std::time::Duration;

use googletest::assert_that;
use googletest::prelude::{contains_substring, eq, none, some};

fn snapshot(id: &str, status: ServiceStatus, uptime: Option<Duration>) -> ServiceSnapshot {
    ServiceSnapshot {
        id: id.into(),
        name: id.to_uppercase(),
        status,
        uptime,
        port: 8501,
        url: "http://localhost:8501".into(),
        pid: uptime.map(|_| 4242),
        last_error: None,
    }
}

fn registry() -> Registry {
    Registry::new(vec![
        ServiceDescriptor::new("call-api", vec!["python".into(), "main.py".into()], ".", 8000),
        ServiceDescriptor::new("call-dashboard", vec!["streamlit".into()], ".", 8502)
            .with_dependencies(&["call-api"])
            .with_secondary_port(8000),
    ])
    .unwrap()
}

// =========================================================================
// Uptime
// =========================================================================

#[test]
fn given_uptime_under_an_hour_when_formatted_then_zero_hours() {
    assert_that!(format_uptime(Duration::from_secs(59)), eq("0h 0m"));
    assert_that!(format_uptime(Duration::from_secs(25 * 60 + 59)), eq("0h 25m"));
}

#[test]
fn given_multi_hour_uptime_when_formatted_then_hours_and_minutes() {
    assert_that!(
        format_uptime(Duration::from_secs(26 * 3600 + 7 * 60 + 3)),
        eq("26h 7m")
    );
}

// =========================================================================
// Tables
// =========================================================================

#[test]
fn given_snapshots_when_status_table_then_columns_aligned() {
    // Given
    let snapshots = vec![
        snapshot("email", ServiceStatus::Online, Some(Duration::from_secs(3720))),
        snapshot("call-dashboard", ServiceStatus::Offline, None),
    ];

    // When
    let table = status_table(&snapshots);

    // Then
    let lines: Vec<&str> = table.lines().collect();
    assert_that!(lines.len(), eq(3));
    assert_that!(lines[0], contains_substring("STATUS"));
    assert_that!(lines[1], contains_substring("1h 2m"));
    assert_that!(lines[1], contains_substring("online"));
    assert_that!(lines[2], contains_substring("offline"));

    let status_column = lines[0].find("STATUS").unwrap();
    assert_that!(lines[1].find("online"), some(eq(status_column)));
    assert_that!(lines[2].find("offline"), some(eq(status_column)));
}

#[test]
fn given_registry_when_services_table_then_ports_and_dependencies_shown() {
    // When
    let table = services_table(&registry());

    // Then
    assert_that!(table, contains_substring("8502+8000"));
    assert_that!(table, contains_substring("call-api"));
    assert_that!(table, contains_substring("python main.py"));
}

#[test]
fn given_startup_order_when_plan_lines_then_numbered() {
    // Given
    let registry = registry();
    let order = registry.startup_order("call-dashboard").unwrap();

    // When
    let plan = plan_lines(&order, &[]);

    // Then
    assert_that!(plan, eq("1. call-api (port 8000)\n2. call-dashboard (port 8502)"));
}

#[test]
fn given_service_with_dependents_when_plan_lines_then_required_by_listed() {
    // Given
    let registry = registry();
    let order = registry.startup_order("call-api").unwrap();
    let dependents = registry.dependents("call-api");

    // When
    let plan = plan_lines(&order, &dependents);

    // Then
    assert_that!(plan, eq("1. call-api (port 8000)\nRequired by: call-dashboard"));
}

#[test]
fn given_plan_view_when_serialized_then_order_and_required_by() {
    // Given
    let registry = registry();
    let order = registry.startup_order("call-dashboard").unwrap();
    let dependents = registry.dependents("call-dashboard");

    // When
    let json = to_json(&PlanView::new(&order, &dependents), false).unwrap();

    // Then
    assert_that!(json, eq(r#"{"order":["call-api","call-dashboard"],"required_by":[]}"#));
}

// =========================================================================
// Reports
// =========================================================================

#[test]
fn given_mixed_reports_when_rendered_then_outcome_or_error_kind_per_line() {
    // Given
    let reports = vec![
        OperationReport::new("email", Ok(StartOutcome::Started)),
        OperationReport::new(
            "crm",
            Err(ServiceError::start_timeout("crm", Duration::from_secs(120))),
        ),
    ];

    // When
    let lines = report_lines(&reports);

    // Then
    assert_that!(lines, contains_substring("email: started"));
    assert_that!(lines, contains_substring("crm: "));
    assert_that!(lines, contains_substring("(StartTimeout)"));
}

#[test]
fn given_failed_report_when_viewed_then_kind_and_chained_message() {
    // Given
    let cause = ServiceError::start_timeout("call-api", Duration::from_secs(30));
    let report: OperationReport<StartOutcome> = OperationReport::new(
        "call-dashboard",
        Err(ServiceError::dependency_failed("call-dashboard", "call-api", cause)),
    );

    // When
    let view = ReportView::from_report(&report);

    // Then
    assert_that!(view.ok, eq(false));
    assert_that!(view.outcome, none());
    assert_that!(view.error_kind, some(eq(ErrorKind::DependencyStartFailed)));
    assert_that!(
        view.error.clone().unwrap(),
        contains_substring("'call-api' did not come online")
    );
}

#[test]
fn given_chained_error_when_error_chain_then_sources_appended() {
    // Given
    let cause = ServiceError::internal("db", "boom");
    let error = ServiceError::dependency_failed("web", "db", cause);

    // When
    let message = error_chain(&error);

    // Then
    assert_that!(message, contains_substring("dependency 'db' failed"));
    assert_that!(message, contains_substring(": Service 'db': boom"));
}

#[test]
fn given_source_in_message_when_error_chain_then_source_printed_once() {
    // Given
    let cause = LaunchError::path_not_found("/nowhere/api");
    let cause_message = cause.to_string();
    let error = ServiceError::launch("api", cause);

    // When
    let message = error_chain(&error);

    // Then
    assert_that!(message.matches(&cause_message).count(), eq(1));
    assert_that!(message, contains_substring("'api' failed to launch"));
}

// =========================================================================
// JSON
// =========================================================================

#[test]
fn given_snapshot_when_serialized_then_uptime_in_seconds_and_snake_case_status() {
    // Given
    let snapshot = snapshot("email", ServiceStatus::StopRequested, Some(Duration::from_secs(125)));

    // When
    let json = to_json(&snapshot, false).unwrap();

    // Then
    assert_that!(json, contains_substring(r#""status":"stop_requested""#));
    assert_that!(json, contains_substring(r#""uptime_secs":125"#));
    assert_that!(json, contains_substring(r#""last_error":null"#));
}

#[test]
fn given_pretty_flag_when_serialized_then_multiline() {
    // When
    let json = to_json(&vec!["call-api", "call-dashboard"], true).unwrap();

    // Then
    assert_that!(json.lines().count(), eq(4));
}
