use crate::cli::Cli;
use crate::commands::Commands;
use crate::output::OutputFormat;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use googletest::assert_that;
use googletest::prelude::{anything, eq, err, some};

#[test]
fn given_start_with_ids_when_parsed_then_ids_in_order() {
    // When
    let cli = Cli::try_parse_from(["sb", "start", "call-api", "crm"]).unwrap();

    // Then
    match cli.command {
        Commands::Start { ids, all } => {
            assert_that!(ids, eq(&vec!["call-api".to_string(), "crm".to_string()]));
            assert_that!(all, eq(false));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn given_start_without_ids_or_all_when_parsed_then_error() {
    // When
    let result = Cli::try_parse_from(["sb", "start"]);

    // Then
    assert_that!(result, err(anything()));
}

#[test]
fn given_stop_with_ids_and_all_when_parsed_then_conflict() {
    // When
    let result = Cli::try_parse_from(["sb", "stop", "crm", "--all"]);

    // Then
    assert_that!(result, err(anything()));
}

#[test]
fn given_stop_all_when_parsed_then_all_flag_set() {
    // When
    let cli = Cli::try_parse_from(["sb", "stop", "--all"]).unwrap();

    // Then
    assert!(matches!(cli.command, Commands::Stop { all: true, .. }));
}

#[test]
fn given_up_with_interval_when_parsed_then_humantime_duration() {
    // When
    let cli = Cli::try_parse_from(["sb", "up", "--interval", "1m 30s"]).unwrap();

    // Then
    match cli.command {
        Commands::Up { ids, interval } => {
            assert_that!(ids.is_empty(), eq(true));
            assert_that!(interval, eq(Duration::from_secs(90)));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn given_up_without_interval_when_parsed_then_five_seconds() {
    // When
    let cli = Cli::try_parse_from(["sb", "up", "email"]).unwrap();

    // Then
    assert!(matches!(
        cli.command,
        Commands::Up { interval, .. } if interval == Duration::from_secs(5)
    ));
}

#[test]
fn given_global_flags_after_subcommand_when_parsed_then_applied() {
    // When
    let cli = Cli::try_parse_from([
        "sb",
        "status",
        "crm",
        "--pretty",
        "--config-dir",
        "/tmp/sb",
    ])
    .unwrap();

    // Then
    assert_that!(cli.config_dir, some(eq(&PathBuf::from("/tmp/sb"))));
    assert_that!(cli.output_format(), eq(OutputFormat::Json { pretty: true }));
    assert!(matches!(cli.command, Commands::Status { id: Some(ref id) } if id == "crm"));
}

#[test]
fn given_no_format_flags_when_parsed_then_table_output() {
    // When
    let cli = Cli::try_parse_from(["sb", "list"]).unwrap();

    // Then
    assert_that!(cli.output_format(), eq(OutputFormat::Table));
}

#[test]
fn given_json_flag_when_parsed_then_compact_json() {
    // When
    let cli = Cli::try_parse_from(["sb", "--json", "plan", "call-dashboard"]).unwrap();

    // Then
    assert_that!(cli.output_format(), eq(OutputFormat::Json { pretty: false }));
}
