//! Centralized constants for environment file loading.
//!
//! This module contains default names and keys shared by the loaders, the
//! sync engine, and the orchestrator.

// =============================================================================
// File Names
// =============================================================================

/// File loaded by a loader that was not given any path.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Names searched in the base directory when no file is specified, in load order.
pub const DEFAULT_SEARCH_FILES: [&str; 6] = [
    ".env",
    ".env.local",
    ".env.development",
    ".env.production",
    ".env.dev",
    ".env.prod",
];

// =============================================================================
// Registry
// =============================================================================

/// Registry entry used for `.env`-style names and files without an extension.
pub const DOTENV_REGISTRY_KEY: &str = "dotenv";

/// Parser name for `KEY=VALUE` files.
pub const DOTENV_PARSER: &str = "dotenv";

/// Parser name for JSON documents.
pub const JSON_PARSER: &str = "json";

// =============================================================================
// Process Environment
// =============================================================================

/// Environment key holding the comma-separated list of keys pushed by the last load.
pub const DEFAULT_KEYS_MARKER: &str = "__ENV_KEYS";

/// Separator used when persisting the previous key set under the marker key.
pub const KEYS_MARKER_SEPARATOR: &str = ",";

/// When set to `1` or `true`, default-name discovery is skipped.
pub const DISCOVERY_DISABLED_VAR: &str = "ENVLOAD_DISCOVERY_DISABLED";
