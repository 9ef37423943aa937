//! JSON document parser.
//!
//! Top-level keys holding objects act as groups: `{"APP": {"ENV": "x"}}`
//! yields `APP_ENV=x` in group `APP`. Deeper objects keep flattening with `_`.
//! Strings are stored verbatim; numbers, booleans, null, and arrays are stored
//! as their compact JSON text.

use std::path::Path;

use serde_json::Value;

use super::Parser;
use crate::constants::JSON_PARSER;
use crate::error::EnvError;
use crate::key::validate_key;
use crate::model::{LoadResult, MergePolicy};

/// Parser for `.json` files holding a single top-level object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl Parser for JsonParser {
    fn name(&self) -> &'static str {
        JSON_PARSER
    }

    /// Empty content is accepted so that it surfaces as `InvalidJson`.
    fn accepts(&self, content: &str) -> bool {
        let trimmed = content.trim_start();
        trimmed.is_empty() || trimmed.starts_with(['{', '['])
    }

    fn parse(
        &self,
        path: &Path,
        content: &str,
        policy: MergePolicy,
    ) -> Result<LoadResult, EnvError> {
        let document: Value =
            serde_json::from_str(content).map_err(|e| EnvError::InvalidJson {
                path: path.to_path_buf(),
                line: e.line(),
                column: e.column(),
            })?;

        let Value::Object(entries) = document else {
            return Err(EnvError::InvalidJson {
                path: path.to_path_buf(),
                line: 1,
                column: 1,
            });
        };

        let mut result = LoadResult::new();
        for (key, value) in entries {
            flatten(path, key, value, policy, &mut result)?;
        }
        Ok(result)
    }
}

fn flatten(
    path: &Path,
    key: String,
    value: Value,
    policy: MergePolicy,
    result: &mut LoadResult,
) -> Result<(), EnvError> {
    match value {
        Value::Object(children) => {
            for (child, value) in children {
                flatten(path, format!("{key}_{child}"), value, policy, result)?;
            }
        }
        Value::String(text) => store(path, key, text, policy, result)?,
        other => store(path, key, other.to_string(), policy, result)?,
    }
    Ok(())
}

fn store(
    path: &Path,
    key: String,
    value: String,
    policy: MergePolicy,
    result: &mut LoadResult,
) -> Result<(), EnvError> {
    validate_key(&key, path)?;
    result.insert(key, value, policy);
    Ok(())
}
