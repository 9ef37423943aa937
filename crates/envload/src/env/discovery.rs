//! Default-name discovery in the base directory.
//!
//! Invariants:
//! - Candidates are returned in `DEFAULT_SEARCH_FILES` order.
//! - Absent candidates are skipped silently; directories are not candidates.
//! - `ENVLOAD_DISCOVERY_DISABLED=1` (or `true`) disables discovery entirely.

use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_SEARCH_FILES, DISCOVERY_DISABLED_VAR};

/// Check if discovery is disabled via environment variable.
pub(crate) fn discovery_disabled() -> bool {
    matches!(
        std::env::var(DISCOVERY_DISABLED_VAR).ok().as_deref(),
        Some("true") | Some("1")
    )
}

/// Default-named files present in `base`.
pub(crate) fn discover_default_files(base: &Path) -> Vec<PathBuf> {
    if discovery_disabled() {
        tracing::debug!(base = %base.display(), "Default file discovery disabled");
        return Vec::new();
    }

    let found: Vec<PathBuf> = DEFAULT_SEARCH_FILES
        .iter()
        .map(|name| base.join(name))
        .filter(|path| path.is_file())
        .collect();
    tracing::debug!(base = %base.display(), found = found.len(), "Discovered default files");
    found
}
