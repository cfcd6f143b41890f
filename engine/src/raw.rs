//! Tolerant accessors over the loosely-typed upstream character record.
//!
//! The upstream schema is only partially documented; missing keys, nulls, and
//! the occasional wrong type are all expected. These helpers default instead
//! of failing for common absence cases, and reserve errors for containers
//! that are present but structurally wrong (see [`expect_array`]).

use anyhow::{Result, bail};
use serde_json::Value;

const EMPTY: &[Value] = &[];

pub fn field<'a>(v: &'a Value, key: &str) -> Option<&'a Value> {
    match v.get(key) {
        Some(Value::Null) | None => None,
        Some(inner) => Some(inner),
    }
}

/// Walk a sequence of object keys, stopping at the first null or miss.
pub fn path<'a>(v: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let mut cur = v;
    for key in keys {
        cur = field(cur, key)?;
    }
    Some(cur)
}

/// Array under `key`; missing or null yields an empty slice.
pub fn arr<'a>(v: &'a Value, key: &str) -> &'a [Value] {
    field(v, key).and_then(Value::as_array).map_or(EMPTY, Vec::as_slice)
}

/// Like [`arr`], but a present non-array value is an error rather than a
/// silent empty. Used where a wrong-typed container should degrade one
/// calculator instead of being ignored.
pub fn expect_array<'a>(v: &'a Value, key: &str) -> Result<&'a [Value]> {
    match field(v, key) {
        None => Ok(EMPTY),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => bail!("field '{}' is not an array (got {})", key, type_name(other)),
    }
}

pub fn int(v: &Value, key: &str) -> Option<i64> {
    field(v, key).and_then(Value::as_i64)
}

pub fn int_or(v: &Value, key: &str, default: i64) -> i64 {
    int(v, key).unwrap_or(default)
}

pub fn str_field<'a>(v: &'a Value, key: &str) -> Option<&'a str> {
    field(v, key).and_then(Value::as_str)
}

pub fn flag(v: &Value, key: &str) -> bool {
    field(v, key).and_then(Value::as_bool).unwrap_or(false)
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
