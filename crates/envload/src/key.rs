//! Key-format validation and group derivation.
//!
//! Invariants:
//! - A key starts with an ASCII letter or `_` and continues with letters, `_`, or `.`.
//!   Digits are never allowed, not even after the first character.
//! - A key's group is its prefix before the first `_`. Keys with no `_`, or
//!   whose first character is `_`, belong to no group.

use std::path::Path;

use crate::error::EnvError;

/// Returns true if `key` satisfies the key-format invariant.
pub fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphabetic() || c == '_' || c == '.')
}

/// Validate `key`, naming `path` as the source in the error.
pub fn validate_key(key: &str, path: &Path) -> Result<(), EnvError> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(EnvError::InvalidEnvKeyFormat {
            key: key.to_string(),
            path: path.to_path_buf(),
        })
    }
}

/// Group name of `key`, if it has one.
pub fn group_of(key: &str) -> Option<&str> {
    match key.split_once('_') {
        Some((prefix, _)) if !prefix.is_empty() => Some(prefix),
        _ => None,
    }
}
