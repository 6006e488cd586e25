//! Coercion of arbitrary JSON input into an [`AnnouncementConfig`].
//!
//! Configuration documents are written by hand by page owners, so every field
//! follows the loose rules a browser script would apply: any value is accepted
//! and converted, nothing but a non-object document is rejected.

use serde_json::Value;
use crate::domain::{AnnouncementConfig, InvalidConfigError};
use crate::metrics;

const OBJECT_STRING: &str = "[object Object]";

pub fn normalize(raw: &Value) -> Result<AnnouncementConfig, InvalidConfigError> {
    if !is_object_like(raw) {
        return Err(InvalidConfigError)
    }
    Ok(AnnouncementConfig {
        enabled: field(raw, "enabled").is_some_and(is_truthy),
        message: field(raw, "message")
            .filter(|value| is_truthy(value))
            .map(stringify)
            .unwrap_or_default(),
        hideable: field(raw, "hideable").is_some_and(is_truthy),
    })
}

pub fn normalize_or_fallback(raw: &Value) -> AnnouncementConfig {
    normalize(raw)
        .inspect_err(|e| {
            log::error!("{e}, using the fallback configuration");
            metrics::CONFIG_FALLBACK_COUNTER.inc();
        })
        .unwrap_or_else(|_| AnnouncementConfig::fallback())
}

/// Objects and arrays; `null` doesn't count although a browser reports it as an object too.
pub fn is_object_like(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => join_array(items),
        Value::Object(_) => OBJECT_STRING.to_owned(),
    }
}

fn join_array(items: &[Value]) -> String {
    items.iter()
        .map(|item| match item {
            Value::Null => String::new(),
            other => stringify(other),
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn format_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string()
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_owned(),
        Some(f) if f.abs() >= 1e21 || f.abs() < 1e-6 => exponential(f),
        Some(f) if f.fract() == 0.0 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// `1e+21`, `1.5e-7`: the shortest mantissa with an always-signed exponent.
fn exponential(f: f64) -> String {
    let formatted = format!("{f:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{mantissa}e+{exponent}"),
        _ => formatted,
    }
}

fn field<'a>(raw: &'a Value, name: &str) -> Option<&'a Value> {
    raw.as_object().and_then(|map| map.get(name))
}
