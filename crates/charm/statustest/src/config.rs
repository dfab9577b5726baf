//! Charm configuration snapshot.
//!
//! The host hands each event a read-only view of the operator-set config.
//! Keys that were never set are simply absent.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CharmResult;

/// Key-value configuration as set by the operator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharmConfig {
    values: BTreeMap<String, Value>,
}

impl CharmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document of top-level keys.
    pub fn from_toml_str(contents: &str) -> CharmResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load config from a TOML file.
    pub fn load(path: &Path) -> CharmResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn unset(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Render a config value for a status message the way the host's own
/// charms do: strings quoted, booleans as `True`/`False`, null as `None`.
///
/// Strings use single quotes unless they contain a single quote and no
/// double quote.
pub fn quote_value(value: &Value) -> String {
    match value {
        Value::String(s) => quote_str(s),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

fn quote_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
