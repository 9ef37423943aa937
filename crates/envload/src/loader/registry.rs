//! Extension to loader-factory registration table.
//!
//! Responsibilities:
//! - Map lowercased extensions (without the leading dot) to loader factories.
//! - Resolve a file path to a loader, falling back to the `dotenv` entry for
//!   `.env`-style names and extensionless files.
//!
//! Invariants:
//! - The last registration for an extension wins.
//! - Built-in entries: `dotenv` and `env` build dotenv loaders, `json` builds JSON loaders.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{FileLoader, Loader, extension_of};
use crate::constants::{DOTENV_PARSER, DOTENV_REGISTRY_KEY, JSON_PARSER};
use crate::error::EnvError;

/// Arguments threaded from `LoaderRegistry::resolve` into a factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Resolved path of the file to load.
    pub file: PathBuf,
    pub override_existing: bool,
}

/// Builds a loader for one file.
pub type LoaderFactory =
    Arc<dyn Fn(LoaderOptions) -> Result<Box<dyn Loader>, EnvError> + Send + Sync>;

/// Registration table consulted when a file's format is not given explicitly.
#[derive(Clone)]
pub struct LoaderRegistry {
    factories: HashMap<String, LoaderFactory>,
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(DOTENV_REGISTRY_KEY, |options| {
            Ok(Box::new(FileLoader::from_options(DOTENV_PARSER, options)))
        });
        registry.register("env", |options| {
            Ok(Box::new(FileLoader::from_options(DOTENV_PARSER, options)))
        });
        registry.register("json", |options| {
            Ok(Box::new(FileLoader::from_options(JSON_PARSER, options)))
        });
        registry
    }
}

impl std::fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("extensions", &self.extensions())
            .finish()
    }
}

impl LoaderRegistry {
    /// Registry with the built-in entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry without any entry.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register `factory` for `extension`, replacing any previous entry.
    pub fn register<F>(&mut self, extension: &str, factory: F)
    where
        F: Fn(LoaderOptions) -> Result<Box<dyn Loader>, EnvError> + Send + Sync + 'static,
    {
        let extension = normalize_extension(extension);
        if self
            .factories
            .insert(extension.clone(), Arc::new(factory))
            .is_some()
        {
            tracing::debug!(extension = %extension, "Replaced loader registration");
        }
    }

    pub fn is_registered(&self, extension: &str) -> bool {
        self.factories
            .contains_key(&normalize_extension(extension))
    }

    /// Registered extensions, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }

    /// Build the loader registered for `file`.
    ///
    /// # Errors
    ///
    /// - `MissingLoader` if neither the extension nor the dotenv fallback applies.
    /// - Any error raised by the factory itself.
    pub fn resolve(
        &self,
        file: &Path,
        override_existing: bool,
    ) -> Result<Box<dyn Loader>, EnvError> {
        let key = self.registry_key(file)?;
        tracing::debug!(path = %file.display(), loader = %key, "Resolved loader");

        let Some(factory) = self.factories.get(&key) else {
            return Err(EnvError::MissingLoader { extension: key });
        };
        factory(LoaderOptions {
            file: file.to_path_buf(),
            override_existing,
        })
    }

    fn registry_key(&self, file: &Path) -> Result<String, EnvError> {
        let extension = extension_of(file);
        if !extension.is_empty() && self.factories.contains_key(&extension) {
            return Ok(extension);
        }

        let name = file
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if (extension.is_empty() || is_dotenv_name(&name))
            && self.factories.contains_key(DOTENV_REGISTRY_KEY)
        {
            return Ok(DOTENV_REGISTRY_KEY.to_string());
        }

        Err(EnvError::MissingLoader { extension })
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_lowercase()
}

/// `.env`, `.env.<anything>`, and `<anything>.env`.
fn is_dotenv_name(name: &str) -> bool {
    name == ".env" || name.starts_with(".env.") || name.ends_with(".env")
}
