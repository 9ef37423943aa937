//! Registry-driven loader for files of mixed formats.

use std::path::PathBuf;

use super::{Loader, LoaderRegistry};
use crate::constants::DEFAULT_ENV_FILE;
use crate::error::EnvError;
use crate::model::{LoadResult, MergePolicy};
use crate::path::PathResolver;

/// Loads each file with the loader its extension is registered to.
#[derive(Debug, Clone)]
pub struct EnvLoader {
    registry: LoaderRegistry,
    files: Vec<PathBuf>,
    policy: MergePolicy,
    resolver: PathResolver,
}

impl EnvLoader {
    pub fn new(registry: LoaderRegistry) -> Self {
        Self {
            registry,
            files: Vec::new(),
            policy: MergePolicy::default(),
            resolver: PathResolver::default(),
        }
    }

    /// Add a file. The first call replaces the default `.env`.
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.files.push(file.into());
        self
    }

    pub fn with_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files.extend(files.into_iter().map(Into::into));
        self
    }

    pub fn with_override(mut self, override_existing: bool) -> Self {
        self.policy = MergePolicy::from_override(override_existing);
        self
    }

    pub fn with_resolver(mut self, resolver: PathResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn files(&self) -> Vec<PathBuf> {
        if self.files.is_empty() {
            vec![PathBuf::from(DEFAULT_ENV_FILE)]
        } else {
            self.files.clone()
        }
    }
}

impl Loader for EnvLoader {
    fn load(&self) -> Result<LoadResult, EnvError> {
        let resolved = self
            .files()
            .iter()
            .map(|file| self.resolver.resolve(file))
            .collect::<Result<Vec<_>, _>>()?;

        let mut merged = LoadResult::new();
        for file in resolved {
            let loader = self.registry.resolve(&file, self.policy.overrides())?;
            merged.merge(loader.load()?, self.policy);
        }
        Ok(merged)
    }
}
