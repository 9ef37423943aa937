//! Error types for environment file loading.
//!
//! Responsibilities:
//! - Define one error variant per failure kind of the loading pipeline.
//! - Carry the path, key, or extension needed to locate the failure.
//!
//! Does NOT handle:
//! - Best-effort recovery (see `Env::safe_load`).
//!
//! Invariants:
//! - Every variant is fatal for the source it names; nothing is committed to
//!   the environment after an error.
//! - Errors NEVER include raw file line contents or values to prevent secret
//!   leakage. Only paths, 1-based line numbers, and keys are reported.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading environment files.
#[derive(Error, Debug)]
pub enum EnvError {
    /// Neither the path itself nor the path joined onto the base directory exists.
    #[error("Unable to locate {path}")]
    PathNotFound { path: PathBuf },

    /// The path exists but cannot be read as a regular file.
    #[error("Unable to open file '{path}': {kind}")]
    UnableToOpenFile { path: PathBuf, kind: ErrorKind },

    /// A format-specific loader was fed a file of another format.
    #[error("File '{path}' is not a {format} file")]
    UnsupportedFileType { path: PathBuf, format: &'static str },

    #[error(
        "No loader registered for the .{extension} extension. Register one with LoaderRegistry::register()"
    )]
    MissingLoader { extension: String },

    #[error("Missing parser '{parser}' for extension {extension}")]
    MissingParser { parser: String, extension: String },

    /// The JSON document failed to parse.
    ///
    /// SAFETY: Only the position of the failure is reported, never the offending text.
    #[error("Invalid JSON in '{path}' at line {line}, column {column}")]
    InvalidJson {
        path: PathBuf,
        line: usize,
        column: usize,
    },

    /// A non-comment dotenv line has no `=`.
    ///
    /// SAFETY: Only the line number is reported, never the line content.
    #[error("Invalid env line at {path}({line})")]
    InvalidEnvLine { path: PathBuf, line: usize },

    #[error("'{key}' does not match the allowed key format [A-Za-z_][A-Za-z_.]* in {path}")]
    InvalidEnvKeyFormat { key: String, path: PathBuf },

    /// A source defines the key that records the committed key list.
    #[error("'{key}' is reserved for the list of synced keys and cannot be loaded")]
    ReservedKey { key: String },
}

impl EnvError {
    /// Build an `UnableToOpenFile` error from an I/O failure on `path`.
    pub(crate) fn open(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        EnvError::UnableToOpenFile {
            path: path.into(),
            kind: err.kind(),
        }
    }
}
