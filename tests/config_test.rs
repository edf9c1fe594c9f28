//! Integration tests for Settings loading with layered precedence.
//!
//! Precedence: compiled defaults < TOML file < `APITREE__*` environment variables.
//!
//! Note: tests in this binary share the process environment. Only the
//! environment test touches `request_methods`, so the file tests never assert it.

use std::fs;

use tempfile::TempDir;

use apitree::application::ApplicationError;
use apitree::config::Settings;
use apitree::domain::{RequestMethod, DEFAULT_MAX_DEPTH};

#[test]
fn given_no_file_when_load_then_defaults() {
    // Act
    let settings = Settings::load(None).expect("load settings");

    // Assert
    assert_eq!(settings.max_depth, DEFAULT_MAX_DEPTH);
    assert_eq!(settings.documentation.indent, "    ");
    assert_eq!(settings.documentation.json_accept, "application/json");
    assert_eq!(settings.documentation.json_renderer, "json");
}

#[test]
fn given_toml_file_when_load_then_file_values_override_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("apitree.toml");
    fs::write(
        &path,
        r#"
max_depth = 16

[documentation]
indent = "\t"
json_renderer = "prettyjson"
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(settings.max_depth, 16);
    assert_eq!(settings.documentation.indent, "\t");
    assert_eq!(settings.documentation.json_renderer, "prettyjson");
    assert_eq!(
        settings.documentation.json_accept, "application/json",
        "unspecified keys keep their defaults"
    );
}

#[test]
fn given_missing_file_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();

    let err = Settings::load(Some(&dir.path().join("missing.toml"))).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_malformed_file_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("apitree.toml");
    fs::write(&path, "max_depth = [").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_env_var_when_load_then_env_overrides_file() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("apitree.toml");
    fs::write(&path, r#"request_methods = ["GET"]"#).unwrap();
    std::env::set_var("APITREE__REQUEST_METHODS", "GET,PATCH");

    // Act
    let result = Settings::load(Some(&path));
    std::env::remove_var("APITREE__REQUEST_METHODS");

    // Assert
    let settings = result.expect("load settings");
    assert_eq!(settings.standard_methods(), RequestMethod::new(["GET", "PATCH"]));
}

#[test]
fn given_settings_when_building_scanner_then_max_depth_applies() {
    let settings = Settings::from_toml_str("max_depth = 2").unwrap();
    assert_eq!(settings.scanner().max_depth(), 2);
}
