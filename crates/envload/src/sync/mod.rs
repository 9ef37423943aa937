//! Synchronization of loaded keys into an environment store.
//!
//! Responsibilities:
//! - Define the `EnvironmentSink` capability (`ProcessEnv` for the real
//!   process environment, `MemoryEnv` for an in-memory store).
//! - Push a merged key set into the sink and remove keys left over from the
//!   previous commit.
//! - Persist the committed key list under a marker key inside the sink so that
//!   independent loaders sharing the sink see each other's previous commit.
//! - Leave out values the sink cannot hold, reporting them instead.
//!
//! Does NOT handle:
//! - Merge precedence. By the time `commit` runs, precedence is resolved and
//!   every key is written unconditionally.
//!
//! Invariants:
//! - After `commit(envs)`, the sink holds every key of `envs` it accepts, none
//!   of the keys of the previous commit that are not written, and the marker
//!   lists exactly the written keys.
//! - Engines sharing a marker share ownership: each commit replaces the key set
//!   of the last one. Engines loading disjoint key sets into one sink need
//!   distinct markers.
//! - Commits are serialized crate-wide; no other commit interleaves with the
//!   remove/apply/record steps.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use crate::constants::{DEFAULT_KEYS_MARKER, KEYS_MARKER_SEPARATOR};
use crate::model::Environment;

mod memory;
mod process;

pub use memory::MemoryEnv;
pub use process::ProcessEnv;

/// A mutable key/value environment store.
pub trait EnvironmentSink {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str);

    fn unset(&mut self, key: &str);

    /// Whether `value` can be stored. Rejected keys are left out of a commit.
    fn accepts(&self, _value: &str) -> bool {
        true
    }

    /// Every key currently present in the store.
    fn snapshot_keys(&self) -> BTreeSet<String>;
}

/// Outcome of a single commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Number of keys written.
    pub applied: usize,
    /// Keys of the previous commit that were removed.
    pub removed: Vec<String>,
    /// Written keys that already held a value before this commit.
    pub replaced: usize,
    /// Keys left out because the sink cannot hold their value.
    pub rejected: Vec<String>,
}

/// Commits loaded keys into an `EnvironmentSink`.
pub struct EnvSync {
    sink: Box<dyn EnvironmentSink>,
    marker: String,
    committed: BTreeSet<String>,
}

impl std::fmt::Debug for EnvSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSync")
            .field("marker", &self.marker)
            .field("committed", &self.committed)
            .finish_non_exhaustive()
    }
}

impl EnvSync {
    pub fn new(sink: Box<dyn EnvironmentSink>) -> Self {
        Self {
            sink,
            marker: DEFAULT_KEYS_MARKER.to_string(),
            committed: BTreeSet::new(),
        }
    }

    /// Use `marker` instead of `__ENV_KEYS` to record committed keys.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn sink(&self) -> &dyn EnvironmentSink {
        self.sink.as_ref()
    }

    /// Keys pushed by the last commit made through this sink.
    ///
    /// Read from the marker key; falls back to this engine's own last commit
    /// if the marker has been removed from the sink.
    pub fn previous_keys(&self) -> BTreeSet<String> {
        match self.sink.get(&self.marker) {
            Some(list) => list
                .split(KEYS_MARKER_SEPARATOR)
                .filter(|key| !key.is_empty())
                .map(str::to_string)
                .collect(),
            None => self.committed.clone(),
        }
    }

    /// Make the sink hold exactly `envs` among the keys this engine owns.
    pub fn commit(&mut self, envs: &Environment) -> SyncReport {
        let _guard = commit_lock();

        let previous = self.previous_keys();
        let existing = self.sink.snapshot_keys();

        let mut rejected = Vec::new();
        let mut accepted = Environment::with_capacity(envs.len());
        for (key, value) in envs {
            if self.sink.accepts(value) {
                accepted.insert(key.clone(), value.clone());
            } else {
                tracing::warn!(key = %key, "Skipping value the environment store cannot hold");
                rejected.push(key.clone());
            }
        }

        let removed: Vec<String> = previous
            .into_iter()
            .filter(|key| !accepted.contains_key(key))
            .collect();
        for key in &removed {
            tracing::debug!(key = %key, "Removing stale environment key");
            self.sink.unset(key);
        }

        let mut replaced = 0;
        for (key, value) in &accepted {
            if existing.contains(key) {
                replaced += 1;
            }
            self.sink.set(key, value);
        }

        if accepted.is_empty() {
            self.sink.unset(&self.marker);
        } else {
            let list: Vec<&str> = accepted.keys().map(String::as_str).collect();
            self.sink.set(&self.marker, &list.join(KEYS_MARKER_SEPARATOR));
        }
        self.committed = accepted.keys().cloned().collect();

        let report = SyncReport {
            applied: accepted.len(),
            removed,
            replaced,
            rejected,
        };
        tracing::info!(
            applied = report.applied,
            removed = report.removed.len(),
            replaced = report.replaced,
            rejected = report.rejected.len(),
            "Synchronized environment"
        );
        report
    }
}

fn commit_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}
