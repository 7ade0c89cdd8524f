//! Response Classification
//!
//! The remote server reports transport problems through the transport's own
//! error channel, but reports business-rule and authorization problems as
//! ordinary replies carrying a special payload shape. This module turns those
//! payloads into typed errors.
//!
//! # Recognized shapes
//!
//! - `{"faultCode": .., "faultString": ..}` - [`BizrpcError::RemoteFault`]
//! - `{"status": .., "status_message": ..}` - [`BizrpcError::RemoteStatus`]
//!
//! A fault code takes precedence when both keys are present. Any other value
//! is returned unchanged.
//!
//! # Example
//!
//! ```
//! use bizrpc_common::protocol::classifier::validate;
//! use serde_json::json;
//!
//! assert_eq!(validate(json!([1, 2, 3])).unwrap(), json!([1, 2, 3]));
//! assert!(validate(json!({"faultCode": 3, "faultString": "x"})).is_err());
//! ```

use serde_json::{Map, Value};

use super::error::{BizrpcError, Result};

pub const FAULT_CODE_KEY: &str = "faultCode";
pub const FAULT_STRING_KEY: &str = "faultString";
pub const STATUS_KEY: &str = "status";
pub const STATUS_MESSAGE_KEYS: [&str; 2] = ["status_message", "statusMessage"];

/// Passes `raw` through, or raises the typed error it declares.
pub fn validate(raw: Value) -> Result<Value> {
    if let Value::Object(map) = &raw {
        check_map(map)?;
    }
    Ok(raw)
}

/// Borrowing variant of [`validate`].
pub fn check(raw: &Value) -> Result<()> {
    match raw {
        Value::Object(map) => check_map(map),
        _ => Ok(()),
    }
}

fn check_map(map: &Map<String, Value>) -> Result<()> {
    if let Some(code) = present(map, FAULT_CODE_KEY) {
        return Err(BizrpcError::RemoteFault {
            code: code.clone(),
            message: message_of(map, &[FAULT_STRING_KEY]),
        });
    }

    if let Some(status) = present(map, STATUS_KEY) {
        return Err(BizrpcError::RemoteStatus {
            status: status.clone(),
            message: message_of(map, &STATUS_MESSAGE_KEYS),
        });
    }

    Ok(())
}

// null counts as absent
fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn message_of(map: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| present(map, key))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_default()
}

/// Whether `raw` is a usable success value: it declares no in-band error and
/// is neither `null` nor the empty string.
pub fn is_success(raw: &Value) -> bool {
    if check(raw).is_err() {
        return false;
    }
    !matches!(raw, Value::Null) && raw.as_str() != Some("")
}

/// Walks `path` into a decoded reply.
///
/// String segments index mappings; numeric segments index sequences (and
/// mappings keyed by the same digits).
pub fn response_entry<'a>(raw: &'a Value, path: &[&str]) -> Result<&'a Value> {
    if path.is_empty() || !(raw.is_object() || raw.is_array()) {
        return Err(BizrpcError::ResponseEntry(format!(
            "invalid response format ({}) or no input keys ({})",
            type_name(raw),
            path.len()
        )));
    }

    let mut current = raw;
    for key in path {
        let next = match current {
            Value::Object(map) => map.get(*key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        current = next.filter(|v| !v.is_null()).ok_or_else(|| {
            BizrpcError::ResponseEntry(format!(
                "entry '{}' not found in ({}) response",
                key,
                type_name(raw)
            ))
        })?;
    }
    Ok(current)
}

/// Loose truthiness used by boolean-returning remote checks.
pub fn truthy(raw: &Value) -> bool {
    match raw {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn type_name(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
