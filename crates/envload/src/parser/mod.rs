//! Format parsers turning file content into a `LoadResult`.
//!
//! Responsibilities:
//! - Define the `Parser` capability shared by every supported format.
//! - Open files, rejecting anything that is not a readable regular file.
//! - Reject content that belongs to another format (`UnsupportedFileType`).
//! - Look up the closed set of parsers by name.
//!
//! Does NOT handle:
//! - Path resolution (see `path.rs`).
//! - Choosing a parser from a file extension (see `loader/registry.rs`).
//!
//! Invariants:
//! - Every key produced by a parser has passed key-format validation.
//! - Duplicate keys inside one file follow the caller's `MergePolicy`.

use std::io::ErrorKind;
use std::path::Path;

use crate::constants::{DOTENV_PARSER, JSON_PARSER};
use crate::error::EnvError;
use crate::model::{LoadResult, MergePolicy};

mod dotenv;
mod json;

pub use dotenv::DotenvParser;
pub use json::JsonParser;

/// A file format that can be parsed into a flat key space.
pub trait Parser: Send + Sync {
    /// Short format identifier, e.g. `"dotenv"`.
    fn name(&self) -> &'static str;

    /// Cheap check that `content` looks like this format.
    fn accepts(&self, content: &str) -> bool;

    /// Parse `content` read from `path`.
    fn parse(
        &self,
        path: &Path,
        content: &str,
        policy: MergePolicy,
    ) -> Result<LoadResult, EnvError>;

    /// Read `path` and parse it.
    ///
    /// # Errors
    ///
    /// - `UnableToOpenFile` if `path` is not a readable regular file.
    /// - `UnsupportedFileType` if the content belongs to another format.
    /// - Any error from [`Parser::parse`].
    fn parse_file(&self, path: &Path, policy: MergePolicy) -> Result<LoadResult, EnvError> {
        let content = read_source(path)?;
        if !self.accepts(&content) {
            return Err(EnvError::UnsupportedFileType {
                path: path.to_path_buf(),
                format: self.name(),
            });
        }
        let result = self.parse(path, &content, policy)?;
        tracing::debug!(
            path = %path.display(),
            format = self.name(),
            keys = result.len(),
            "Parsed environment file"
        );
        Ok(result)
    }
}

/// Parser registered under `name`, if it exists.
pub fn parser_by_name(name: &str) -> Option<Box<dyn Parser>> {
    match name {
        DOTENV_PARSER => Some(Box::new(DotenvParser)),
        JSON_PARSER => Some(Box::new(JsonParser)),
        _ => None,
    }
}

/// Read a regular file to a string.
pub(crate) fn read_source(path: &Path) -> Result<String, EnvError> {
    let metadata = std::fs::metadata(path).map_err(|e| EnvError::open(path, &e))?;
    if !metadata.is_file() {
        let kind = if metadata.is_dir() {
            ErrorKind::IsADirectory
        } else {
            ErrorKind::InvalidInput
        };
        return Err(EnvError::UnableToOpenFile {
            path: path.to_path_buf(),
            kind,
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| EnvError::open(path, &e))?;
    match content.strip_prefix('\u{feff}') {
        Some(stripped) => Ok(stripped.to_string()),
        None => Ok(content),
    }
}
