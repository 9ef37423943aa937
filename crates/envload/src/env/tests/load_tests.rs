//! Tests for lazy loading and queries.

use tempfile::TempDir;

use super::{builder_in, write};
use crate::env::Env;
use crate::loader::FileLoader;
use crate::model::Environment;
use crate::sync::{EnvironmentSink, MemoryEnv};

#[test]
fn test_load_reads_dotenv_and_json_in_order() {
    let temp_dir = TempDir::new().unwrap();
    write(&temp_dir, ".env", "FOO=bar\n");
    write(&temp_dir, "env.json", "{\n\"APP\":{\n\"ENV\":\"testing\"\n}\n}\n");
    let sink = MemoryEnv::new();

    let mut env = builder_in(&temp_dir, &sink)
        .with_files([".env", "env.json"])
        .build()
        .unwrap();
    let loaded = env.load().unwrap();

    let keys: Vec<&str> = loaded.keys().collect();
    assert_eq!(keys, vec!["FOO", "APP_ENV"]);
    assert_eq!(sink.get("FOO").as_deref(), Some("bar"));
    assert_eq!(sink.get("APP_ENV").as_deref(), Some("testing"));
    assert_eq!(sink.get("__ENV_KEYS").as_deref(), Some("FOO,APP_ENV"));
}

#[test]
fn test_build_does_not_read_files() {
    let temp_dir = TempDir::new().unwrap();
    let sink = MemoryEnv::new();

    // The file does not exist yet; building must still succeed.
    let mut env = builder_in(&temp_dir, &sink)
        .with_file("late.env")
        .build()
        .unwrap();
    assert!(!env.is_loaded());
    assert!(env.snapshot().is_none());

    write(&temp_dir, "late.env", "LATE=yes\n");
    assert_eq!(env.get("LATE").unwrap(), Some("yes"));
    assert!(env.is_loaded());
}

#[test]
fn test_queries_load_lazily() {
    let temp_dir = TempDir::new().unwrap();
    write(&temp_dir, "app.env", "DB_HOST=localhost\nDB_USER=root\nSECRET=x\n");
    let sink = MemoryEnv::new();

    let mut env = builder_in(&temp_dir, &sink)
        .with_file("app.env")
        .build()
        .unwrap();

    assert!(env.has("DB_HOST").unwrap());
    assert!(!env.has("DB_PASS").unwrap());
    assert_eq!(env.get("SECRET").unwrap(), Some("x"));
    assert_eq!(env.get("MISSING").unwrap(), None);
    assert_eq!(env.get_or("MISSING", "fallback").unwrap(), "fallback");

    let db = env.group("DB").unwrap().unwrap();
    assert_eq!(db.len(), 2);
    assert_eq!(db["DB_USER"], "root");
    assert!(env.group("SECRET").unwrap().is_none());
    assert_eq!(env.groups().unwrap().len(), 1);
    assert_eq!(env.all().unwrap().len(), 3);
}

#[test]
fn test_group_or_returns_default_for_unknown_group() {
    let temp_dir = TempDir::new().unwrap();
    write(&temp_dir, "app.env", "APP_ENV=dev\n");
    let sink = MemoryEnv::new();
    let fallback: Environment = [("CACHE_DRIVER".to_string(), "file".to_string())]
        .into_iter()
        .collect();

    let mut env = builder_in(&temp_dir, &sink)
        .with_file("app.env")
        .build()
        .unwrap();

    assert_eq!(env.group_or("CACHE", &fallback).unwrap(), &fallback);
    assert_eq!(env.group_or("APP", &fallback).unwrap()["APP_ENV"], "dev");
}

#[test]
fn test_load_runs_once() {
    let temp_dir = TempDir::new().unwrap();
    let file = write(&temp_dir, "app.env", "APP_ENV=dev\n");
    let sink = MemoryEnv::new();

    let mut env = builder_in(&temp_dir, &sink)
        .with_file("app.env")
        .build()
        .unwrap();
    env.load().unwrap();

    std::fs::write(&file, "APP_ENV=prod\n").unwrap();
    assert_eq!(env.load().unwrap().get("APP_ENV"), Some("dev"));
    assert_eq!(env.get("APP_ENV").unwrap(), Some("dev"));
}

#[test]
fn test_explicit_loader_source() {
    let temp_dir = TempDir::new().unwrap();
    let file = write(&temp_dir, "settings.cfg", "{\"MAIL\": {\"HOST\": \"smtp\"}}");
    let sink = MemoryEnv::new();

    let mut env = builder_in(&temp_dir, &sink)
        .with_loader(FileLoader::json().with_file(file))
        .build()
        .unwrap();

    assert_eq!(env.get("MAIL_HOST").unwrap(), Some("smtp"));
}

#[test]
fn test_dump_pairs_loaded_keys_with_sink_values() {
    let temp_dir = TempDir::new().unwrap();
    write(&temp_dir, "app.env", "APP_ENV=dev\nAPP_NAME=demo\n");
    let mut sink = MemoryEnv::new();

    let mut env = builder_in(&temp_dir, &sink)
        .with_file("app.env")
        .build()
        .unwrap();
    env.load().unwrap();
    sink.set("APP_NAME", "changed");
    sink.unset("APP_ENV");

    let dump = env.dump().unwrap();
    assert_eq!(dump.envs["APP_NAME"], "demo");
    assert_eq!(dump.groups["APP"].len(), 2);
    assert_eq!(dump.process["APP_NAME"].as_deref(), Some("changed"));
    assert_eq!(dump.process["APP_ENV"], None);

    let json = serde_json::to_value(&dump).unwrap();
    assert_eq!(json["envs"]["APP_ENV"], "dev");
    assert_eq!(json["process"]["APP_ENV"], serde_json::Value::Null);
}

#[test]
fn test_from_file_builds_single_source_orchestrator() {
    let env = Env::from_file("/definitely/not/here.env").unwrap();
    assert!(!env.is_loaded());
}
