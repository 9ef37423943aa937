//! Loaders turning file paths into a merged `LoadResult`.
//!
//! Responsibilities:
//! - Define the `Loader` capability composed by the orchestrator.
//! - Provide `FileLoader`, the shared skeleton for single-format loading.
//! - Provide `EnvLoader`, which picks a loader per file through the registry.
//!
//! Does NOT handle:
//! - Writing to the process environment (see `sync`).
//! - The loaded/unloaded state machine (see `env`).
//!
//! Invariants:
//! - Every path is resolved before any file is parsed; a missing file aborts
//!   the load before anything is read.
//! - Sources are merged in the order given, following the loader's `MergePolicy`.
//! - A failed source fails the whole load; there is no partial result.

use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_ENV_FILE;
use crate::error::EnvError;
use crate::model::{LoadResult, LoaderDescriptor, MergePolicy};
use crate::parser::{DotenvParser, JsonParser, Parser, parser_by_name};
use crate::path::PathResolver;

mod multi;
mod registry;

pub use multi::EnvLoader;
pub use registry::{LoaderFactory, LoaderOptions, LoaderRegistry};

/// A source of environment keys.
pub trait Loader {
    /// Read every source and return the merged result.
    fn load(&self) -> Result<LoadResult, EnvError>;
}

/// Parser slot of a `FileLoader`; a missing parser is reported on load.
enum ParserSlot {
    Ready(Box<dyn Parser>),
    Missing(String),
}

/// Loads one or more files of a single format.
pub struct FileLoader {
    files: Vec<PathBuf>,
    policy: MergePolicy,
    resolver: PathResolver,
    parser: ParserSlot,
}

impl FileLoader {
    /// Loader for `parser`, reading `.env` unless files are added.
    pub fn new(parser: Box<dyn Parser>) -> Self {
        Self {
            files: Vec::new(),
            policy: MergePolicy::default(),
            resolver: PathResolver::default(),
            parser: ParserSlot::Ready(parser),
        }
    }

    pub fn dotenv() -> Self {
        Self::new(Box::new(DotenvParser))
    }

    pub fn json() -> Self {
        Self::new(Box::new(JsonParser))
    }

    /// Loader for the parser registered under `name`.
    ///
    /// An unknown name is not an error until `load()`, which then fails with
    /// `EnvError::MissingParser`.
    pub fn named(name: &str) -> Self {
        let parser = match parser_by_name(name) {
            Some(parser) => ParserSlot::Ready(parser),
            None => ParserSlot::Missing(name.to_string()),
        };
        Self {
            parser,
            ..Self::new(Box::new(DotenvParser))
        }
    }

    /// Loader for a single file handed over by the registry.
    pub fn from_options(name: &str, options: LoaderOptions) -> Self {
        let base = options
            .file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::named(name)
            .with_file(options.file)
            .with_override(options.override_existing)
            .with_resolver(PathResolver::new(base))
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

    /// Let later definitions of a key replace earlier ones.
    pub fn with_override(mut self, override_existing: bool) -> Self {
        self.policy = MergePolicy::from_override(override_existing);
        self
    }

    pub fn with_resolver(mut self, resolver: PathResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Files this loader reads, in order.
    pub fn files(&self) -> Vec<PathBuf> {
        if self.files.is_empty() {
            vec![PathBuf::from(DEFAULT_ENV_FILE)]
        } else {
            self.files.clone()
        }
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Format identifier, or the requested name if no such parser exists.
    pub fn format(&self) -> &str {
        match &self.parser {
            ParserSlot::Ready(parser) => parser.name(),
            ParserSlot::Missing(name) => name,
        }
    }

    /// Resolve every file to a descriptor.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::PathNotFound` for the first file that does not exist.
    pub fn describe(&self) -> Result<Vec<LoaderDescriptor>, EnvError> {
        let format = match &self.parser {
            ParserSlot::Ready(parser) => parser.name(),
            ParserSlot::Missing(_) => "",
        };
        self.files()
            .into_iter()
            .map(|path| {
                let resolved = self.resolver.resolve(&path)?;
                Ok(LoaderDescriptor {
                    path,
                    resolved,
                    format,
                })
            })
            .collect()
    }
}

impl Loader for FileLoader {
    fn load(&self) -> Result<LoadResult, EnvError> {
        let descriptors = self.describe()?;

        let parser = match &self.parser {
            ParserSlot::Ready(parser) => parser,
            ParserSlot::Missing(name) => {
                let extension = descriptors
                    .first()
                    .map(|d| extension_of(&d.resolved))
                    .unwrap_or_default();
                return Err(EnvError::MissingParser {
                    parser: name.clone(),
                    extension,
                });
            }
        };

        let mut merged = LoadResult::new();
        for descriptor in descriptors {
            let loaded = parser.parse_file(&descriptor.resolved, self.policy)?;
            merged.merge(loaded, self.policy);
        }
        Ok(merged)
    }
}

/// Lowercased extension of `path` without the dot, or empty.
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
