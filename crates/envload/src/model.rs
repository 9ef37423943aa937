//! Core data types shared by parsers, loaders, and the orchestrator.
//!
//! Invariants:
//! - `Environment` preserves insertion order (file order, then line order).
//! - Every key stored in a `LoadResult` that has a group appears in exactly
//!   that one group, with the same value as in the flat map.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

use crate::key::group_of;

/// Ordered flat key/value map.
pub type Environment = IndexMap<String, String>;

/// Group name to the keys of that group.
pub type GroupMap = IndexMap<String, Environment>;

/// How a repeated key is treated when a later source defines it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// The first definition wins; later ones are ignored.
    #[default]
    KeepFirst,
    /// The last definition wins.
    Override,
}

impl MergePolicy {
    pub fn from_override(override_existing: bool) -> Self {
        if override_existing {
            MergePolicy::Override
        } else {
            MergePolicy::KeepFirst
        }
    }

    pub fn overrides(self) -> bool {
        self == MergePolicy::Override
    }
}

/// A file scheduled for loading: the path as given, where it resolved, and its format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderDescriptor {
    pub path: PathBuf,
    pub resolved: PathBuf,
    pub format: &'static str,
}

/// Flat and grouped view of the keys loaded from one or more sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadResult {
    envs: Environment,
    groups: GroupMap,
}

impl LoadResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a result from a flat map, deriving groups from the keys.
    pub fn from_envs(envs: Environment) -> Self {
        let mut result = Self::new();
        for (key, value) in envs {
            result.insert(key, value, MergePolicy::Override);
        }
        result
    }

    /// Store `key`, honoring `policy` if it is already present.
    ///
    /// Returns `true` if the value was stored. A replaced key keeps its
    /// original position.
    pub fn insert(&mut self, key: String, value: String, policy: MergePolicy) -> bool {
        if self.envs.contains_key(&key) && !policy.overrides() {
            return false;
        }
        if let Some(group) = group_of(&key) {
            self.groups
                .entry(group.to_string())
                .or_default()
                .insert(key.clone(), value.clone());
        }
        self.envs.insert(key, value);
        true
    }

    /// Merge `other` into `self` in `other`'s order.
    pub fn merge(&mut self, other: LoadResult, policy: MergePolicy) {
        for (key, value) in other.envs {
            self.insert(key, value, policy);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.envs.get(key).map(String::as_str)
    }

    pub fn group(&self, name: &str) -> Option<&Environment> {
        self.groups.get(name)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.envs.contains_key(key)
    }

    pub fn envs(&self) -> &Environment {
        &self.envs
    }

    pub fn groups(&self) -> &GroupMap {
        &self.groups
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.envs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.envs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }

    pub fn into_parts(self) -> (Environment, GroupMap) {
        (self.envs, self.groups)
    }
}
