//! Integration tests for the `validate` command.
use guano::cli::handle_validate_command;
use guano::log::is_logger_initialised;
use guano::settings::Settings;
use std::path::PathBuf;

/// Get the path to the example scenario.
fn get_scenario_path() -> PathBuf {
    PathBuf::from("demos/basic/scenario.toml")
}

/// An integration test for the `validate` command.
///
/// We also check that the logger is initialised after it is run.
#[test]
fn test_handle_validate_command() {
    unsafe { std::env::set_var("GUANO_LOG_LEVEL", "off") };

    assert!(!is_logger_initialised());

    handle_validate_command(&get_scenario_path(), Some(Settings::default())).unwrap();

    assert!(is_logger_initialised());
}
