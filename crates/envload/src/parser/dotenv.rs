//! `KEY=VALUE` line parser.
//!
//! Responsibilities:
//! - Skip blank lines and lines whose trimmed form starts with `#`.
//! - Split each remaining line on its first `=`.
//! - Normalize both sides: trim, strip one layer of matching quotes, then
//!   remove all remaining whitespace.
//!
//! Does NOT handle:
//! - Multi-line values, escape sequences, or variable interpolation.
//!
//! Invariants:
//! - Values never contain whitespace. `NAME="hello world"` yields `helloworld`.
//! - A line without `=` is an error, never skipped.

use std::path::Path;

use super::Parser;
use crate::constants::DOTENV_PARSER;
use crate::error::EnvError;
use crate::key::validate_key;
use crate::model::{LoadResult, MergePolicy};

/// Parser for `.env` style files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotenvParser;

impl Parser for DotenvParser {
    fn name(&self) -> &'static str {
        DOTENV_PARSER
    }

    /// Rejects content whose first significant line opens a JSON document.
    fn accepts(&self, content: &str) -> bool {
        significant_lines(content)
            .next()
            .is_none_or(|(_, line)| !line.starts_with(['{', '[']))
    }

    fn parse(
        &self,
        path: &Path,
        content: &str,
        policy: MergePolicy,
    ) -> Result<LoadResult, EnvError> {
        let mut result = LoadResult::new();

        for (line_number, line) in significant_lines(content) {
            let Some((raw_key, raw_value)) = line.split_once('=') else {
                return Err(EnvError::InvalidEnvLine {
                    path: path.to_path_buf(),
                    line: line_number,
                });
            };

            let key = normalize_token(raw_key);
            validate_key(&key, path)?;
            let value = normalize_token(raw_value);

            if !result.insert(key, value, policy) {
                tracing::debug!(
                    path = %path.display(),
                    line = line_number,
                    "Ignoring repeated key"
                );
            }
        }

        Ok(result)
    }
}

/// Trimmed lines that are neither blank nor comments, with 1-based line numbers.
fn significant_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn normalize_token(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = strip_quotes(trimmed);
    unquoted.chars().filter(|c| !c.is_whitespace()).collect()
}

fn strip_quotes(token: &str) -> &str {
    for quote in ['"', '\''] {
        if token.len() >= 2
            && let Some(inner) = token
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    token
}
