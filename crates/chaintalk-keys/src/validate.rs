//! Structural predicates over untrusted JSON values.
//!
//! The predicates never fail; they only answer yes or no. Schema checks
//! built on top of them return [`Invalid`] with a reason, so callers
//! pattern-match a tagged result instead of re-checking fields.

use serde_json::Value;

/// Why a value was rejected by a schema check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalid {
    pub reason: String,
}

impl Invalid {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for Invalid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reason)
    }
}

/// True iff `value` is a key-value object (not an array, null or primitive).
pub fn is_non_null_object(value: &Value) -> bool {
    value.is_object()
}

/// True iff `value` is an object that directly owns every name in `keys`.
///
/// Value types are not checked.
pub fn is_non_null_object_with_keys(value: &Value, keys: &[&str]) -> bool {
    match value.as_object() {
        Some(map) => keys.iter().all(|k| map.contains_key(*k)),
        None => false,
    }
}

/// True iff `value` is a string of length > 0. Whitespace counts.
pub fn is_non_empty_string(value: &Value) -> bool {
    value.as_str().is_some_and(|s| !s.is_empty())
}

/// True iff `value` is a JSON number.
pub fn is_numeric(value: &Value) -> bool {
    value.is_number()
}

/// True iff `value` is a string. Empty strings count.
pub fn is_string(value: &Value) -> bool {
    value.is_string()
}

/// Require `value` to be an object owning `keys`, naming the first missing key.
pub fn require_keys(value: &Value, keys: &[&str]) -> std::result::Result<(), Invalid> {
    if !is_non_null_object(value) {
        return Err(Invalid::new(format!(
            "expected a JSON object, found {}",
            kind_of(value)
        )));
    }
    if let Some(missing) = keys
        .iter()
        .find(|key| !is_non_null_object_with_keys(value, &[**key]))
    {
        return Err(Invalid::new(format!("missing key `{missing}`")));
    }
    Ok(())
}

/// Require `value[key]` to satisfy `check`, returning the field.
pub fn require_field<'a>(
    value: &'a Value,
    key: &str,
    check: fn(&Value) -> bool,
    expected: &str,
) -> std::result::Result<&'a Value, Invalid> {
    match value.get(key) {
        Some(field) if check(field) => Ok(field),
        Some(_) => Err(Invalid::new(format!("`{key}` must be {expected}"))),
        None => Err(Invalid::new(format!("missing key `{key}`"))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
