//! Default-on-missing field accessors for loosely-structured JSON payloads
//!
//! Every entity mapper reads its named fields through these helpers so the
//! defaulting policy lives in one place:
//!
//! - strings default to `""`
//! - counts default to `0`, and are coerced from numeric strings
//! - optional structured fields default to `None`
//! - nested objects default to an empty map
//!
//! Keys a mapper does not name are kept in a [`RawData`] map, in source order.

use crate::error::CoreError;
use serde_json::{Map, Value};

/// Unmapped keys retained from a source payload, in arrival order.
pub type RawData = Map<String, Value>;

static EMPTY: std::sync::LazyLock<Map<String, Value>> = std::sync::LazyLock::new(Map::new);

/// View a JSON value as an object, or an empty object for anything else.
pub fn as_object(value: &Value) -> &Map<String, Value> {
    value.as_object().unwrap_or(&EMPTY)
}

/// Read a string field. Numbers and booleans are rendered as text.
pub fn string_field(data: &Map<String, Value>, key: &str) -> String {
    match data.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Read a string field from the first map that carries a non-empty value.
pub fn first_string_field(sources: &[&Map<String, Value>], key: &str) -> String {
    sources
        .iter()
        .map(|data| string_field(data, key))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

/// Read a non-negative count, defaulting to 0.
pub fn count_field(data: &Map<String, Value>, key: &str) -> u64 {
    data.get(key).map(coerce_count).unwrap_or(0)
}

/// Coerce an arbitrary JSON value into a non-negative integer.
///
/// Numeric strings are parsed from their leading digits (`"42"` and `"42 likes"`
/// both give 42). Negative, fractional-below-one and non-numeric values give 0.
pub fn coerce_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u64>().unwrap_or(0)
        }
        Value::Bool(true) => 1,
        _ => 0,
    }
}

/// Read a boolean flag. Accepts `true`, `"true"` and non-zero numbers.
pub fn bool_field(data: &Map<String, Value>, key: &str) -> bool {
    match data.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

/// Read an optional value; `null` counts as absent.
pub fn optional_field(data: &Map<String, Value>, key: &str) -> Option<Value> {
    data.get(key).filter(|v| !v.is_null()).cloned()
}

/// Read an optional list; a non-list value counts as absent.
pub fn optional_array(data: &Map<String, Value>, key: &str) -> Option<Vec<Value>> {
    data.get(key).and_then(Value::as_array).cloned()
}

/// Read a list, defaulting to empty.
pub fn array_field(data: &Map<String, Value>, key: &str) -> Vec<Value> {
    optional_array(data, key).unwrap_or_default()
}

/// Read a list of strings, skipping non-string entries.
pub fn string_list_field(data: &Map<String, Value>, key: &str) -> Vec<String> {
    data.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Read a nested object, defaulting to an empty map.
pub fn object_field<'a>(data: &'a Map<String, Value>, key: &str) -> &'a Map<String, Value> {
    data.get(key).map(as_object).unwrap_or(&EMPTY)
}

/// Collect every key not listed in `mapped`, preserving source order.
pub fn collect_raw_data(data: &Map<String, Value>, mapped: &[&str]) -> RawData {
    data.iter()
        .filter(|(key, _)| !mapped.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Require a top-level list in a transported response.
///
/// Missing keys are a contract violation, distinct from an empty list.
pub fn require_array<'a>(response: &'a Value, key: &str) -> Result<&'a Vec<Value>, CoreError> {
    response
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| CoreError::InvalidResponseShape(format!("expected a `{key}` list")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_string_field_defaults_to_empty() {
        let data = map(json!({"name": "alice", "age": 3, "nothing": null}));
        assert_eq!(string_field(&data, "name"), "alice");
        assert_eq!(string_field(&data, "age"), "3");
        assert_eq!(string_field(&data, "nothing"), "");
        assert_eq!(string_field(&data, "missing"), "");
    }

    #[test]
    fn test_count_field_coercion() {
        let data = map(json!({
            "int": 12,
            "string": "34",
            "suffixed": "56 likes",
            "float": 7.9,
            "negative": -3,
            "garbage": "abc",
            "object": {}
        }));
        assert_eq!(count_field(&data, "int"), 12);
        assert_eq!(count_field(&data, "string"), 34);
        assert_eq!(count_field(&data, "suffixed"), 56);
        assert_eq!(count_field(&data, "float"), 7);
        assert_eq!(count_field(&data, "negative"), 0);
        assert_eq!(count_field(&data, "garbage"), 0);
        assert_eq!(count_field(&data, "object"), 0);
        assert_eq!(count_field(&data, "missing"), 0);
    }

    #[test]
    fn test_first_string_field_prefers_earlier_sources() {
        let record = map(json!({"text": "from record"}));
        let top = map(json!({"text": "from top"}));
        assert_eq!(first_string_field(&[&record, &top], "text"), "from record");

        let empty = map(json!({"text": ""}));
        assert_eq!(first_string_field(&[&empty, &top], "text"), "from top");
    }

    #[test]
    fn test_object_field_missing_is_empty() {
        let data = map(json!({"author": "not an object"}));
        assert!(object_field(&data, "author").is_empty());
        assert!(object_field(&data, "creator").is_empty());
    }

    #[test]
    fn test_collect_raw_data_preserves_order() {
        let data = map(json!({"zeta": 1, "did": "x", "alpha": 2, "handle": "y", "mid": 3}));
        let raw = collect_raw_data(&data, &["did", "handle"]);
        let keys: Vec<&str> = raw.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_require_array() {
        let ok = json!({"posts": []});
        assert!(require_array(&ok, "posts").unwrap().is_empty());

        let missing = json!({"feed": []});
        assert!(matches!(
            require_array(&missing, "posts"),
            Err(CoreError::InvalidResponseShape(_))
        ));

        let wrong_type = json!({"posts": {}});
        assert!(require_array(&wrong_type, "posts").is_err());
    }
}
