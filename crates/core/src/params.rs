//! Typed lookups into a JSON parameter object.
//!
//! Every helper falls back to the supplied default when the key is missing
//! or holds the wrong JSON type, so a partial `--params` object always
//! yields a usable configuration.

use serde_json::Value;

/// `params[name]` as `f64`. Integers are accepted and widened.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// `params[name]` as `f64`, clamped into `[min, max]`.
///
/// Out-of-range values are pulled to the nearest bound rather than rejected.
pub fn param_f64_clamped(params: &Value, name: &str, default: f64, min: f64, max: f64) -> f64 {
    param_f64(params, name, default).clamp(min, max)
}

/// `params[name]` as a non-negative integer.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

/// `params[name]` as `u64`.
pub fn param_u64(params: &Value, name: &str, default: u64) -> u64 {
    params.get(name).and_then(Value::as_u64).unwrap_or(default)
}

pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}
