//! Tests for the `Env` orchestrator.
//!
//! Responsibilities:
//! - Test the lazy load, reload, and safe-load state machine.
//! - Test precedence between discovered files, explicit sources, and defaults.
//! - Test that failures commit nothing.
//! - Test default-name discovery through the orchestrator.
//!
//! Does NOT handle:
//! - Line-level parsing rules (tested in `parser`).
//! - Marker bookkeeping in isolation (tested in `sync`).
//!
//! Invariants:
//! - Tests sync into a `MemoryEnv` unless they exercise the process environment,
//!   in which case they run `#[serial]` under `env_lock()`.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tempfile::TempDir;

use super::EnvBuilder;
use crate::sync::MemoryEnv;

pub mod discovery_tests;
pub mod load_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// Write `content` to `name` inside `dir` and return the full path.
pub fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Builder rooted at `dir`, syncing into `sink`, with discovery off.
pub fn builder_in(dir: &TempDir, sink: &MemoryEnv) -> EnvBuilder {
    EnvBuilder::new()
        .with_base_path(dir.path())
        .with_sink(sink.clone())
        .with_discovery(false)
}
