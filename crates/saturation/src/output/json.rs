//! JSON serialization for tables and series.

use serde::Serialize;

/// Serialize a value to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for tables and
/// series, whose gaps serialize as `null`).
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Serialize a value to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}
