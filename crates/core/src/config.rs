//! Read-only configuration lookups
//!
//! The configuration is a flat JSON object loaded once by the shell. This
//! module only parses and queries it; it never reads files.

use crate::error::CoreError;
use crate::fields::coerce_count;
use serde_json::{Map, Value};

/// Default XRPC service.
pub const DEFAULT_SERVICE_BASE_URL: &str = "https://bsky.social/xrpc";

/// Default excerpt length for `#textexcerpt#`.
pub const DEFAULT_EXCERPT_LENGTH: usize = 80;

/// Default location of the filter spec.
pub const DEFAULT_FILTER_FILE: &str = "filter.json";

/// Query parameters as sent on the wire, in order. Keys may repeat.
pub type QueryParams = Vec<(String, String)>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    values: Map<String, Value>,
}

impl Config {
    /// Parse a configuration document. The top level must be an object.
    pub fn from_json_str(input: &str) -> Result<Self, CoreError> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| CoreError::Config(format!("invalid JSON: {e}")))?;
        match value {
            Value::Object(values) => Ok(Self { values }),
            other => Err(CoreError::Config(format!(
                "expected a JSON object at the top level, found {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !v.is_null())
    }

    /// Non-empty string value of `key`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn all(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn service_base_url(&self) -> &str {
        self.get_str("service_baseurl")
            .unwrap_or(DEFAULT_SERVICE_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn username(&self) -> Option<&str> {
        self.get_str("bluesky_username")
    }

    pub fn password(&self) -> Option<&str> {
        self.get_str("bluesky_password")
    }

    /// Actor whose feed `getFeed` shows when none is given.
    pub fn timeline_did(&self) -> Option<&str> {
        self.get_str("timeline-did")
    }

    pub fn filter_file(&self) -> &str {
        self.get_str("filter-file").unwrap_or(DEFAULT_FILTER_FILE)
    }

    /// Maximum excerpt length. Reads `excerpt-length`, then the legacy
    /// `exerpt-length`; zero or absent gives [`DEFAULT_EXCERPT_LENGTH`].
    pub fn excerpt_length(&self) -> usize {
        ["excerpt-length", "exerpt-length"]
            .iter()
            .filter_map(|key| self.get(key))
            .map(|v| coerce_count(v) as usize)
            .find(|len| *len > 0)
            .unwrap_or(DEFAULT_EXCERPT_LENGTH)
    }

    /// Default query map for an operation (`query-defaults.<operation>`).
    pub fn query_defaults(&self, operation: &str) -> Map<String, Value> {
        self.get("query-defaults")
            .and_then(|d| d.get(operation))
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Fill gaps in caller-supplied parameters from configuration defaults.
///
/// A default is used only when the caller supplied no value for that key.
/// Array defaults expand to repeated parameters; `null` defaults are skipped.
pub fn merge_query_defaults(mut params: QueryParams, defaults: &Map<String, Value>) -> QueryParams {
    for (key, value) in defaults {
        if params.iter().any(|(k, _)| k == key) {
            continue;
        }
        match value {
            Value::Array(items) => {
                params.extend(items.iter().filter_map(scalar_to_param).map(|v| (key.clone(), v)));
            }
            other => {
                if let Some(v) = scalar_to_param(other) {
                    params.push((key.clone(), v));
                }
            }
        }
    }
    params
}

fn scalar_to_param(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
