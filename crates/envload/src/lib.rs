//! Environment file loading for applications.
//!
//! This crate reads `.env` and JSON files into a validated flat key space
//! with derived groups, and keeps the process environment in sync with the
//! loaded keys, removing keys that a previous load set but the current one
//! no longer defines.

pub mod constants;
mod env;
mod error;
pub mod key;
pub mod loader;
mod model;
pub mod parser;
pub mod path;
pub mod sync;

pub use env::{Env, EnvBuilder, EnvDump};
pub use error::EnvError;
pub use loader::{EnvLoader, FileLoader, Loader, LoaderOptions, LoaderRegistry};
pub use model::{Environment, GroupMap, LoadResult, LoaderDescriptor, MergePolicy};
pub use parser::{DotenvParser, JsonParser, Parser};
pub use path::PathResolver;
pub use sync::{EnvSync, EnvironmentSink, MemoryEnv, ProcessEnv, SyncReport};
