//! In-memory environment store.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::EnvironmentSink;
use crate::model::Environment;

/// Shared in-memory environment.
///
/// Clones share the same storage, so a handle kept by the caller observes
/// every write made through a clone handed to `EnvSync`.
#[derive(Debug, Clone, Default)]
pub struct MemoryEnv {
    vars: Arc<Mutex<Environment>>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current contents, in insertion order.
    pub fn vars(&self) -> Environment {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Environment> {
        self.vars.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EnvironmentSink for MemoryEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    fn unset(&mut self, key: &str) {
        self.lock().shift_remove(key);
    }

    fn snapshot_keys(&self) -> BTreeSet<String> {
        self.lock().keys().cloned().collect()
    }
}
