//! Orchestrator composing loaders into one queryable, synced snapshot.
//!
//! Responsibilities:
//! - Run the pipeline: discovered files, explicit sources, fallback defaults,
//!   merge, then a single sync commit.
//! - Gate the pipeline behind a once-only loaded state with explicit reload.
//! - Answer `get`/`group`/`has`/`dump` queries, loading lazily on first access.
//!
//! Does NOT handle:
//! - Parsing or file resolution (see `loader`, `parser`, `path`).
//! - Writing the environment store directly (see `sync`).
//!
//! Invariants:
//! - `load()` runs the pipeline at most once until `reload()` is called.
//! - A failed load commits nothing and leaves the orchestrator unloaded.
//! - Explicit sources always win over discovered files for the same key;
//!   fallback defaults never replace a loaded key.
//! - No source may define the marker key; such a load fails before committing.
//! - Orchestrators sharing a sink and a marker key share one committed key set:
//!   a load through one removes keys committed by the other. Give each
//!   orchestrator its own marker (`EnvBuilder::with_marker_key`) to keep
//!   disjoint key sets side by side.
//! - `reload()` drops only the local snapshot; the previously committed key
//!   set stays in the sink so the next commit can remove stale keys.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::EnvError;
use crate::loader::{EnvLoader, Loader, LoaderRegistry};
use crate::model::{Environment, GroupMap, LoadResult, MergePolicy};
use crate::path::PathResolver;
use crate::sync::{EnvSync, SyncReport};

mod builder;
mod discovery;

#[cfg(test)]
mod tests;

pub use builder::EnvBuilder;

/// Default-name discovery settings captured at build time.
#[derive(Debug, Clone)]
struct DiscoveredSource {
    base: PathBuf,
    registry: LoaderRegistry,
    policy: MergePolicy,
}

impl DiscoveredSource {
    fn load(&self) -> Result<LoadResult, EnvError> {
        let files = discovery::discover_default_files(&self.base);
        if files.is_empty() {
            return Ok(LoadResult::new());
        }
        EnvLoader::new(self.registry.clone())
            .with_files(files)
            .with_override(self.policy.overrides())
            .with_resolver(PathResolver::new(&self.base))
            .load()
    }
}

/// Snapshot of loaded keys alongside what the environment store holds for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvDump {
    pub envs: Environment,
    pub groups: GroupMap,
    /// Value currently held by the sink for each loaded key.
    pub process: IndexMap<String, Option<String>>,
}

/// Loads environment files once and serves queries from the merged result.
pub struct Env {
    sources: Vec<Box<dyn Loader>>,
    discovered: Option<DiscoveredSource>,
    defaults: Environment,
    policy: MergePolicy,
    sync: EnvSync,
    snapshot: Option<LoadResult>,
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("sources", &self.sources.len())
            .field("discovered", &self.discovered)
            .field("policy", &self.policy)
            .field("sync", &self.sync)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl Env {
    pub fn builder() -> EnvBuilder {
        EnvBuilder::new()
    }

    /// Orchestrator over the default-named files of the working directory,
    /// synced into the process environment.
    pub fn new() -> Result<Self, EnvError> {
        EnvBuilder::new().build()
    }

    /// Orchestrator over a single file whose format is guessed from its name.
    pub fn from_file(file: impl AsRef<Path>) -> Result<Self, EnvError> {
        EnvBuilder::new()
            .with_file(file.as_ref().to_path_buf())
            .build()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Loaded snapshot without triggering a load.
    pub fn snapshot(&self) -> Option<&LoadResult> {
        self.snapshot.as_ref()
    }

    /// Run the pipeline unless already loaded.
    ///
    /// # Errors
    ///
    /// Returns the first error of any source. Nothing is committed in that case.
    pub fn load(&mut self) -> Result<&LoadResult, EnvError> {
        if self.snapshot.is_none() {
            let loaded = self.run_pipeline()?;
            self.snapshot = Some(loaded);
        }
        Ok(&*self.snapshot.get_or_insert_with(LoadResult::new))
    }

    /// Drop the local snapshot and run the pipeline again.
    pub fn reload(&mut self) -> Result<&LoadResult, EnvError> {
        self.snapshot = None;
        self.load()
    }

    /// Like `load()`, but an error yields an empty snapshot instead.
    ///
    /// The orchestrator counts as loaded afterwards; call `reload()` to retry.
    pub fn safe_load(&mut self) -> &LoadResult {
        if self.snapshot.is_none() {
            let loaded = match self.run_pipeline() {
                Ok(loaded) => loaded,
                Err(e) => {
                    tracing::warn!(error = %e, "Environment load failed, continuing without it");
                    LoadResult::new()
                }
            };
            self.snapshot = Some(loaded);
        }
        self.snapshot.get_or_insert_with(LoadResult::new)
    }

    pub fn get(&mut self, key: &str) -> Result<Option<&str>, EnvError> {
        Ok(self.load()?.get(key))
    }

    pub fn get_or<'a>(&'a mut self, key: &str, default: &'a str) -> Result<&'a str, EnvError> {
        Ok(self.load()?.get(key).unwrap_or(default))
    }

    /// Every loaded key, in load order.
    pub fn all(&mut self) -> Result<&Environment, EnvError> {
        Ok(self.load()?.envs())
    }

    pub fn group(&mut self, name: &str) -> Result<Option<&Environment>, EnvError> {
        Ok(self.load()?.group(name))
    }

    pub fn group_or<'a>(
        &'a mut self,
        name: &str,
        default: &'a Environment,
    ) -> Result<&'a Environment, EnvError> {
        Ok(self.load()?.group(name).unwrap_or(default))
    }

    pub fn groups(&mut self) -> Result<&GroupMap, EnvError> {
        Ok(self.load()?.groups())
    }

    pub fn has(&mut self, key: &str) -> Result<bool, EnvError> {
        Ok(self.load()?.contains_key(key))
    }

    pub fn dump(&mut self) -> Result<EnvDump, EnvError> {
        let loaded = self.load()?.clone();
        let sink = self.sync.sink();
        let process = loaded
            .keys()
            .map(|key| (key.to_string(), sink.get(key)))
            .collect();
        let (envs, groups) = loaded.into_parts();
        Ok(EnvDump {
            envs,
            groups,
            process,
        })
    }

    fn run_pipeline(&mut self) -> Result<LoadResult, EnvError> {
        let mut explicit = LoadResult::new();
        for source in &self.sources {
            explicit.merge(source.load()?, self.policy);
        }

        let mut merged = match &self.discovered {
            Some(discovered) => discovered.load()?,
            None => LoadResult::new(),
        };
        merged.merge(explicit, MergePolicy::Override);
        merged.merge(
            LoadResult::from_envs(self.defaults.clone()),
            MergePolicy::KeepFirst,
        );

        let marker = self.sync.marker();
        if merged.contains_key(marker) {
            return Err(EnvError::ReservedKey {
                key: marker.to_string(),
            });
        }

        let SyncReport { applied, removed, .. } = self.sync.commit(merged.envs());
        tracing::debug!(
            keys = applied,
            stale = removed.len(),
            groups = merged.groups().len(),
            "Environment loaded"
        );
        Ok(merged)
    }
}
