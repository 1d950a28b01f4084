//! Integration tests for the `run` command.
use guano::cli::{RunOpts, handle_run_command};
use guano::settings::Settings;
use std::path::PathBuf;
use tempfile::tempdir;

/// Get the path to the example scenario.
fn get_scenario_path() -> PathBuf {
    PathBuf::from("demos/census/scenario.toml")
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("GUANO_LOG_LEVEL", "off") };

    {
        // Write a log file to check that the log directory is used
        let tempdir = tempdir().unwrap();
        let opts = RunOpts {
            years: Some("13-15".into()),
            log_dir: Some(tempdir.path().to_path_buf()),
        };
        handle_run_command(&get_scenario_path(), &opts, Some(Settings::default())).unwrap();
        assert!(tempdir.path().join("guano.log").is_file());
    }

    // Second time will fail because the logging is already initialised
    assert_eq!(
        handle_run_command(
            &get_scenario_path(),
            &RunOpts::default(),
            Some(Settings::default())
        )
        .unwrap_err()
        .chain()
        .next()
        .unwrap()
        .to_string(),
        "Failed to initialise logging."
    );
}
