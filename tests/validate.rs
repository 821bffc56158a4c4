//! Integration tests for the `validate` command.
use lcoe_tables::cli::handle_validate_command;
use lcoe_tables::log::is_logger_initialised;
use lcoe_tables::settings::Settings;
use std::path::PathBuf;

/// Get the path to the example country specifications.
fn get_specs_path() -> PathBuf {
    PathBuf::from("demos/sub_saharan_africa/specs.csv")
}

/// An integration test for the `validate` command.
///
/// We also check that the logger is initialised after it is run.
#[test]
fn test_handle_validate_command() {
    unsafe { std::env::set_var("LCOE_TABLES_LOG_LEVEL", "off") };

    assert!(!is_logger_initialised());

    handle_validate_command(&get_specs_path(), false, Some(Settings::default())).unwrap();

    assert!(is_logger_initialised());
}
