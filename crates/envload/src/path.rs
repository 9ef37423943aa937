//! Path normalization and resolution for environment files.
//!
//! Responsibilities:
//! - Rewrite `/` and `\` to the platform separator.
//! - Detect POSIX (`/...`) and drive-letter (`C:\...`) absolute paths on every platform.
//! - Resolve a user-given path directly or against a base directory.
//!
//! Does NOT handle:
//! - Opening or reading files (see `loader`).
//!
//! Invariants:
//! - `normalize`, `join`, and `is_absolute` are pure string functions.
//! - `resolve` performs existence checks only; it never reads file contents.

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use crate::error::EnvError;

/// Resolves environment file paths against a base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    base_path: PathBuf,
}

impl Default for PathResolver {
    /// Resolver rooted at the current working directory.
    fn default() -> Self {
        let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(base)
    }
}

impl PathResolver {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve `path` to an existing location.
    ///
    /// The normalized path is tried as given first (relative paths are taken
    /// against the working directory), then joined onto the base directory.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::PathNotFound` if neither candidate exists.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<PathBuf, EnvError> {
        let raw = path.as_ref().to_string_lossy();
        let normalized = Self::normalize(&raw);

        let direct = PathBuf::from(&normalized);
        if !normalized.is_empty() && direct.exists() {
            return Ok(std::path::absolute(&direct).unwrap_or(direct));
        }

        let base = self.base_path.to_string_lossy();
        let joined = PathBuf::from(Self::join([base.as_ref(), normalized.as_str()]));
        if joined.exists() {
            return Ok(std::path::absolute(&joined).unwrap_or(joined));
        }

        Err(EnvError::PathNotFound {
            path: PathBuf::from(raw.as_ref()),
        })
    }

    /// Rewrite separators and strip leading/trailing ones unless the path is absolute.
    pub fn normalize(path: &str) -> String {
        let converted = to_platform_separators(path);
        if Self::is_absolute(path) {
            converted
        } else {
            converted.trim_matches(MAIN_SEPARATOR).to_string()
        }
    }

    /// True for `/...`, `\...`, and drive-letter paths such as `C:\...` or `C:/...`.
    pub fn is_absolute(path: &str) -> bool {
        match path.as_bytes() {
            [b'/' | b'\\', ..] => true,
            [drive, b':', b'/' | b'\\', ..] => drive.is_ascii_alphabetic(),
            _ => false,
        }
    }

    /// Join segments with the platform separator.
    ///
    /// The first segment keeps its absoluteness; later segments are stripped
    /// of surrounding separators and empty ones are skipped.
    pub fn join<I, S>(segments: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut segments = segments.into_iter();
        let Some(first) = segments.next() else {
            return String::new();
        };
        let first = first.as_ref();
        let absolute = Self::is_absolute(first);

        let mut joined = to_platform_separators(first)
            .trim_end_matches(MAIN_SEPARATOR)
            .to_string();

        for segment in segments {
            let segment = to_platform_separators(segment.as_ref());
            let segment = segment.trim_matches(MAIN_SEPARATOR);
            if segment.is_empty() {
                continue;
            }
            if !joined.is_empty() || absolute {
                joined.push(MAIN_SEPARATOR);
            }
            joined.push_str(segment);
        }

        if joined.is_empty() && absolute {
            joined.push(MAIN_SEPARATOR);
        }
        joined
    }
}

fn to_platform_separators(path: &str) -> String {
    path.chars()
        .map(|c| if c == '/' || c == '\\' { MAIN_SEPARATOR } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sep(path: &str) -> String {
        path.replace('/', &MAIN_SEPARATOR.to_string())
    }

    #[test]
    fn test_is_absolute_recognizes_posix_and_drive_paths() {
        assert!(PathResolver::is_absolute("/var/www"));
        assert!(PathResolver::is_absolute("\\server\\share"));
        assert!(PathResolver::is_absolute("C:\\Users"));
        assert!(PathResolver::is_absolute("d:/data"));
        assert!(!PathResolver::is_absolute("var/www"));
        assert!(!PathResolver::is_absolute("C:relative"));
        assert!(!PathResolver::is_absolute(""));
    }

    #[test]
    fn test_normalize_strips_separators_on_relative_paths() {
        assert_eq!(PathResolver::normalize("/config/.env/"), sep("/config/.env/"));
        assert_eq!(PathResolver::normalize("config\\.env\\"), sep("config/.env"));
        assert_eq!(PathResolver::normalize("config/sub/"), sep("config/sub"));
    }

    #[test]
    fn test_join_preserves_absoluteness_of_first_segment() {
        assert_eq!(PathResolver::join(["/var", "www", "html"]), sep("/var/www/html"));
        assert_eq!(PathResolver::join(["/var/", "/www/"]), sep("/var/www"));
        assert_eq!(PathResolver::join(["var", "www"]), sep("var/www"));
        assert_eq!(PathResolver::join(["/", "etc"]), sep("/etc"));
        assert_eq!(PathResolver::join(["/"]), sep("/"));
        assert_eq!(PathResolver::join(["C:\\", "Users", "Public"]), sep("C:/Users/Public"));
    }

    #[test]
    fn test_join_skips_empty_segments() {
        assert_eq!(PathResolver::join(["base", "", "/", "file"]), sep("base/file"));
        assert_eq!(PathResolver::join(Vec::<&str>::new()), "");
    }

    #[test]
    fn test_resolve_absolute_existing_path() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join(".env");
        fs::write(&file, "A=b").unwrap();

        let resolver = PathResolver::new("/nonexistent-base");
        let resolved = resolver.resolve(&file).unwrap();
        assert_eq!(resolved, file);
    }

    #[test]
    fn test_resolve_against_base_path() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("conf")).unwrap();
        fs::write(temp_dir.path().join("conf").join("app.env"), "A=b").unwrap();

        let expected = temp_dir.path().join("conf").join("app.env");
        let resolver = PathResolver::new(temp_dir.path());

        assert_eq!(resolver.resolve("conf\\app.env").unwrap(), expected);
        // Falls back to the base directory when the rooted path does not exist.
        assert_eq!(resolver.resolve("/conf/app.env/").unwrap(), expected);
    }

    #[test]
    fn test_working_directory_wins_over_base_path() {
        // Tests run from the package root, which holds a Cargo.toml.
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("Cargo.toml"), "").unwrap();
        let expected = std::path::absolute("Cargo.toml").unwrap();

        let resolver = PathResolver::new(temp_dir.path());
        assert_eq!(resolver.resolve("Cargo.toml").unwrap(), expected);
    }

    #[test]
    fn test_resolve_missing_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = PathResolver::new(temp_dir.path());

        match resolver.resolve("env.unknown") {
            Err(EnvError::PathNotFound { path }) => assert_eq!(path, PathBuf::from("env.unknown")),
            other => panic!("expected PathNotFound, got {other:?}"),
        }
    }
}
