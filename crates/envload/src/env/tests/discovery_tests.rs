//! Tests for default-name discovery through the orchestrator.
//!
//! Invariants / Assumptions:
//! - Tests run `#[serial]` because they toggle `ENVLOAD_DISCOVERY_DISABLED`.

use serial_test::serial;
use tempfile::TempDir;

use super::write;
use crate::constants::DISCOVERY_DISABLED_VAR;
use crate::env::EnvBuilder;
use crate::sync::{EnvironmentSink, MemoryEnv};

#[test]
#[serial]
fn test_discovery_runs_when_no_source_is_given() {
    let temp_dir = TempDir::new().unwrap();
    write(&temp_dir, ".env", "APP_ENV=dev\n");
    write(&temp_dir, ".env.production", "APP_NAME=demo\n");
    let sink = MemoryEnv::new();

    temp_env::with_var_unset(DISCOVERY_DISABLED_VAR, || {
        let mut env = EnvBuilder::new()
            .with_base_path(temp_dir.path())
            .with_sink(sink.clone())
            .build()
            .unwrap();

        let keys: Vec<&str> = env.load().unwrap().keys().collect();
        assert_eq!(keys, vec!["APP_ENV", "APP_NAME"]);
    });
    assert_eq!(sink.get("APP_NAME").as_deref(), Some("demo"));
}

#[test]
#[serial]
fn test_no_default_files_loads_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let sink = MemoryEnv::new();

    temp_env::with_var_unset(DISCOVERY_DISABLED_VAR, || {
        let mut env = EnvBuilder::new()
            .with_base_path(temp_dir.path())
            .with_sink(sink.clone())
            .build()
            .unwrap();

        assert!(env.load().unwrap().is_empty());
        assert!(env.is_loaded());
    });
}

#[test]
#[serial]
fn test_discovery_skipped_when_sources_given() {
    let temp_dir = TempDir::new().unwrap();
    write(&temp_dir, ".env", "DISCOVERED=yes\n");
    write(&temp_dir, "app.env", "APP_ENV=dev\n");
    let sink = MemoryEnv::new();

    temp_env::with_var_unset(DISCOVERY_DISABLED_VAR, || {
        let mut env = EnvBuilder::new()
            .with_base_path(temp_dir.path())
            .with_sink(sink.clone())
            .with_file("app.env")
            .build()
            .unwrap();

        assert!(!env.has("DISCOVERED").unwrap());
        assert!(env.has("APP_ENV").unwrap());
    });
}

#[test]
#[serial]
fn test_disabled_gate_skips_discovery() {
    let temp_dir = TempDir::new().unwrap();
    write(&temp_dir, ".env", "APP_ENV=dev\n");
    let sink = MemoryEnv::new();

    temp_env::with_var(DISCOVERY_DISABLED_VAR, Some("1"), || {
        let mut env = EnvBuilder::new()
            .with_base_path(temp_dir.path())
            .with_sink(sink.clone())
            .build()
            .unwrap();

        assert!(env.load().unwrap().is_empty());
    });
    assert_eq!(sink.get("APP_ENV"), None);
}
