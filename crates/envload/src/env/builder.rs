//! Builder for the `Env` orchestrator.
//!
//! Responsibilities:
//! - Collect sources (file paths and explicit loaders) in the order given.
//! - Collect the base path, override flag, registry, sink, and marker key.
//! - Validate fallback defaults before any load runs.
//!
//! Invariants / Assumptions:
//! - Each file path is loaded through the registry (format guessed from its name).
//! - Default-name discovery runs when no source is given, or when requested
//!   explicitly with `with_discovery(true)`.
//! - Building never reads files; the first load happens lazily.

use std::path::{Path, PathBuf};

use super::{DiscoveredSource, Env};
use crate::error::EnvError;
use crate::key::validate_key;
use crate::loader::{EnvLoader, Loader, LoaderRegistry};
use crate::model::{Environment, MergePolicy};
use crate::path::PathResolver;
use crate::sync::{EnvSync, EnvironmentSink, ProcessEnv};

/// Source label used when a fallback default has an invalid key.
const DEFAULTS_SOURCE: &str = "<defaults>";

/// Configures and builds an [`Env`].
pub struct EnvBuilder {
    sources: Vec<SourceSpec>,
    base_path: Option<PathBuf>,
    override_existing: bool,
    registry: Option<LoaderRegistry>,
    discovery: Option<bool>,
    defaults: Environment,
    sink: Option<Box<dyn EnvironmentSink>>,
    marker: Option<String>,
}

enum SourceSpec {
    File(PathBuf),
    Loader(Box<dyn Loader>),
}

impl Default for EnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvBuilder {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            base_path: None,
            override_existing: false,
            registry: None,
            discovery: None,
            defaults: Environment::new(),
            sink: None,
            marker: None,
        }
    }

    /// Load `file`, choosing its loader from the registry.
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.sources.push(SourceSpec::File(file.into()));
        self
    }

    pub fn with_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.sources
            .extend(files.into_iter().map(|file| SourceSpec::File(file.into())));
        self
    }

    /// Load from an explicitly constructed loader.
    pub fn with_loader(mut self, loader: impl Loader + 'static) -> Self {
        self.sources.push(SourceSpec::Loader(Box::new(loader)));
        self
    }

    /// Fallback directory for relative file paths, and the directory searched
    /// by discovery.
    ///
    /// A relative path that exists against the current working directory is
    /// used as is; only otherwise is it joined onto this directory. Defaults
    /// to the current working directory.
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Let later sources replace keys defined by earlier ones.
    pub fn with_override(mut self, override_existing: bool) -> Self {
        self.override_existing = override_existing;
        self
    }

    pub fn with_registry(mut self, registry: LoaderRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Force default-name discovery on or off.
    ///
    /// Discovered files have lower precedence than every explicit source.
    pub fn with_discovery(mut self, enabled: bool) -> Self {
        self.discovery = Some(enabled);
        self
    }

    /// Values used for keys that no source defines.
    pub fn with_defaults<I, K, V>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.defaults.extend(
            defaults
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        self
    }

    /// Store to sync loaded keys into. Defaults to the process environment.
    pub fn with_sink(mut self, sink: impl EnvironmentSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Key recording the previously committed key list inside the sink.
    ///
    /// Orchestrators sharing a sink and a marker remove each other's keys on
    /// load. Use distinct markers for orchestrators loading disjoint key sets.
    pub fn with_marker_key(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Build the orchestrator without loading anything.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::InvalidEnvKeyFormat` if a fallback default has an invalid key.
    pub fn build(self) -> Result<Env, EnvError> {
        for key in self.defaults.keys() {
            validate_key(key, Path::new(DEFAULTS_SOURCE))?;
        }

        let resolver = match self.base_path {
            Some(base) => PathResolver::new(base),
            None => PathResolver::default(),
        };
        let registry = self.registry.unwrap_or_default();
        let policy = MergePolicy::from_override(self.override_existing);

        let discover = self.discovery.unwrap_or(self.sources.is_empty());
        let discovered = discover.then(|| DiscoveredSource {
            base: resolver.base_path().to_path_buf(),
            registry: registry.clone(),
            policy,
        });

        let sources: Vec<Box<dyn Loader>> = self
            .sources
            .into_iter()
            .map(|spec| match spec {
                SourceSpec::File(file) => Box::new(
                    EnvLoader::new(registry.clone())
                        .with_file(file)
                        .with_override(policy.overrides())
                        .with_resolver(resolver.clone()),
                ) as Box<dyn Loader>,
                SourceSpec::Loader(loader) => loader,
            })
            .collect();

        let sink = self.sink.unwrap_or_else(|| Box::new(ProcessEnv));
        let mut sync = EnvSync::new(sink);
        if let Some(marker) = self.marker {
            sync = sync.with_marker(marker);
        }

        Ok(Env {
            sources,
            discovered,
            defaults: self.defaults,
            policy,
            sync,
            snapshot: None,
        })
    }
}
