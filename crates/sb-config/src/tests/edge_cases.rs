use crate::tests::{EnvGuard, setup_config_dir, write_services_toml};
use crate::{Config, LogLevel};

use std::str::FromStr;

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, eq, err};
use serial_test::serial;

// =========================================================================
// Edge Cases
// =========================================================================

#[test]
#[serial]
fn given_malformed_toml_when_load_then_error_mentions_file() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_services_toml(&temp, "this is not valid toml {{{{");

    // When
    let result = Config::load();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring("services.toml"));
}

#[test]
#[serial]
fn given_service_missing_port_when_load_then_error() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_services_toml(
        &temp,
        r#"
            [[services]]
            id = "api"
            command = ["python", "main.py"]
        "#,
    );

    // When
    let result = Config::load();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_empty_services_array_when_validate_then_error() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_services_toml(&temp, "services = []");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_log_dir_with_traversal_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _dir = EnvGuard::set("SB_LOG_DIR", "../../var/log");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
    assert_that!(
        format!("{}", result.unwrap_err()),
        contains_substring("..")
    );
}

#[test]
fn given_unknown_log_level_when_parse_then_defaults_to_info() {
    let level = LogLevel::from_str("chatty").unwrap();

    assert_that!(level.as_directive(), eq("info"));
}
