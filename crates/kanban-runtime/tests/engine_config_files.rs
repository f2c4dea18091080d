#![cfg(feature = "engine-config")]

//! Loading `EngineConfig` from TOML and JSON files.

use std::io::Write;
use std::time::Duration;

use kanban_runtime::{EngineConfig, EngineConfigError};

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn toml_file_overrides_selected_fields() {
    let file = write_temp(
        ".toml",
        "[coalescer]\nthrottle_interval_ms = 33\n",
    );
    let config = EngineConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config.coalescer.throttle_interval_ms, 33);
    assert_eq!(config.coalescer.debounce_delay_ms, 200);

    let coalescer = config.validated().unwrap().to_coalescer_config();
    assert_eq!(coalescer.throttle_interval, Duration::from_millis(33));
}

#[test]
fn json_file_round_trips_defaults() {
    let json = serde_json::to_string(&EngineConfig::default()).unwrap();
    let file = write_temp(".json", &json);
    assert_eq!(
        EngineConfig::from_json_file(file.path()).unwrap(),
        EngineConfig::default()
    );
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EngineConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, EngineConfigError::Io(_)));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn malformed_documents_report_format() {
    let err = EngineConfig::from_toml_str("[coalescer\n").unwrap_err();
    assert!(matches!(err, EngineConfigError::Toml(_)));
    assert!(err.to_string().starts_with("TOML parse error"));

    let err = EngineConfig::from_json_str(r#"{"coalescer": {"debounce_delay_ms": "soon"}}"#)
        .unwrap_err();
    assert!(matches!(err, EngineConfigError::Json(_)));
}

#[test]
fn invalid_values_fail_validation() {
    let config = EngineConfig::from_toml_str(
        "[coalescer]\nthrottle_interval_ms = 0\ndebounce_delay_ms = 0\n",
    )
    .unwrap();
    match config.validated() {
        Err(EngineConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
        other => panic!("expected validation failure, got {other:?}"),
    }
}
