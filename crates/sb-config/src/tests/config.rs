use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir, write_services_toml};

use googletest::assert_that;
use googletest::prelude::{anything, eq, ok, some};
use serial_test::serial;

// =========================================================================
// Happy Path Tests
// =========================================================================

#[test]
#[serial]
fn given_no_config_file_when_load_then_ok_with_default_services() {
    // Given
    let _temp = setup_config_dir();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    let config = result.unwrap();
    let ids: Vec<&str> = config.services.iter().map(|s| s.id.as_str()).collect();
    assert_that!(ids, eq(&vec!["call-api", "email", "call-dashboard", "crm"]));
    assert_that!(config.orchestrator.startup_timeout_secs, eq(30));
    assert_that!(config.orchestrator.probe_timeout_ms, eq(1000));
}

#[test]
#[serial]
fn given_no_config_file_when_load_and_validate_then_ok() {
    // Given
    let _temp = setup_config_dir();

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_missing_config_dir_when_load_from_then_dir_is_created() {
    // Given
    let temp = tempfile::TempDir::new().unwrap();
    let config_dir = temp.path().join("nested").join(".switchboard");

    // When
    let result = Config::load_from(&config_dir);

    // Then
    assert_that!(result, ok(anything()));
    assert_that!(config_dir.is_dir(), eq(true));
}

#[test]
#[serial]
fn given_valid_toml_file_when_load_then_uses_toml_values() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_services_toml(
        &temp,
        r#"
            [orchestrator]
            startup_timeout_secs = 45
            auto_start = ["api"]

            [[services]]
            id = "api"
            name = "API"
            command = ["python", "main.py"]
            working_dir = "api"
            port = 9100

            [[services]]
            id = "ui"
            command = ["npm", "start"]
            port = 9101
            secondary_port = 9100
            depends_on = ["api"]
        "#,
    );

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.orchestrator.startup_timeout_secs, eq(45));
    assert_that!(config.orchestrator.auto_start, eq(&vec!["api".to_string()]));
    assert_that!(config.services.len(), eq(2));
    assert_that!(config.services[1].depends_on, eq(&vec!["api".to_string()]));
    assert_that!(config.services[1].secondary_port, some(eq(9100)));
    assert_that!(config.services[1].display_name(), eq("ui"));
    assert_that!(config.validate(), ok(anything()));
}

#[test]
#[serial]
fn given_env_var_and_toml_when_load_then_env_var_overrides_toml() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_services_toml(&temp, "[orchestrator]\nstop_timeout_secs = 20");
    let _stop = EnvGuard::set("SB_STOP_TIMEOUT_SECS", "5");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.orchestrator.stop_timeout_secs, eq(5));
}

#[test]
#[serial]
fn given_multiple_env_overrides_when_load_then_all_apply() {
    // Given
    let _temp = setup_config_dir();
    let _probe = EnvGuard::set("SB_PROBE_TIMEOUT_MS", "300");
    let _poll = EnvGuard::set("SB_POLL_INTERVAL_MS", "50");
    let _level = EnvGuard::set("SB_LOG_LEVEL", "debug");
    let _colored = EnvGuard::set("SB_LOG_COLORED", "false");
    let _file = EnvGuard::set("SB_LOG_FILE", "1");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.orchestrator.probe_timeout_ms, eq(300));
    assert_that!(config.orchestrator.poll_interval_ms, eq(50));
    assert_that!(*config.logging.level, eq(log::LevelFilter::Debug));
    assert_that!(config.logging.colored, eq(false));
    assert_that!(config.logging.file, eq(true));
}

#[test]
#[serial]
fn given_loaded_config_when_resolving_paths_then_relative_to_config_parent() {
    // Given
    let (temp, _guard) = setup_config_dir();

    // When
    let config = Config::load().unwrap();

    // Then
    let root = temp.path().parent().unwrap().to_path_buf();
    assert_that!(config.root_dir(), eq(&root));
    assert_that!(
        config.resolve_working_dir(std::path::Path::new("Call-System")),
        eq(&root.join("Call-System"))
    );
    assert_that!(config.log_dir(), eq(&temp.path().join("logs")));
}
