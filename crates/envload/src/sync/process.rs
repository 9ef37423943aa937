//! The operating-system process environment as an `EnvironmentSink`.
//!
//! Invariants:
//! - Keys reaching this sink have passed key-format validation, so they are
//!   never empty and never contain `=` or NUL.
//! - Values containing NUL cannot be stored in the process environment. The
//!   sink rejects them, so `EnvSync` leaves their keys out of the commit, and a
//!   direct `set` with such a value is a no-op instead of a panic.

use std::collections::BTreeSet;

use super::EnvironmentSink;

/// Reads and writes the environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvironmentSink for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        if !self.accepts(value) {
            return;
        }
        // SAFETY: writes go through `EnvSync::commit`, which holds the crate-wide
        // commit lock. Callers reading the environment from other threads while a
        // load runs must serialize with it themselves.
        unsafe {
            std::env::set_var(key, value);
        }
    }

    fn unset(&mut self, key: &str) {
        // SAFETY: see `set`.
        unsafe {
            std::env::remove_var(key);
        }
    }

    fn accepts(&self, value: &str) -> bool {
        !value.contains('\0')
    }

    fn snapshot_keys(&self) -> BTreeSet<String> {
        std::env::vars_os()
            .map(|(key, _)| key.to_string_lossy().into_owned())
            .collect()
    }
}
