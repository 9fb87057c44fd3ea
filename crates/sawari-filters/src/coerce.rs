// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loose coercion of planner-supplied JSON values into typed filter values.
//!
//! The planner expresses preferences however it likes: booleans arrive as
//! `true`, `"true"`, `"yes"`, or `1`; integers as numbers or numeric
//! strings; lists as arrays or comma-separated strings. Coercion failure
//! returns `None` and the caller drops the key, never aborting the pass.

use serde_json::Value;

/// Coerces a value to a boolean.
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Coerces a value to a non-negative integer.
pub fn coerce_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|i| u32::try_from(i).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Coerces a value to a list of non-empty strings.
///
/// Accepts an array of strings, a single string, or a comma-separated
/// string ("Hindi, English").
pub fn coerce_string_list(value: &Value) -> Option<Vec<String>> {
    let items: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        _ => return None,
    };
    if items.is_empty() { None } else { Some(items) }
}

/// Coerces a value to a plain trimmed string.
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bool_coercion_accepts_common_spellings() {
        for truthy in [json!(true), json!("true"), json!("YES"), json!(1), json!("on")] {
            assert_eq!(coerce_bool(&truthy), Some(true), "{truthy:?}");
        }
        for falsy in [json!(false), json!("false"), json!("no"), json!(0), json!("off")] {
            assert_eq!(coerce_bool(&falsy), Some(false), "{falsy:?}");
        }
        assert_eq!(coerce_bool(&json!("maybe")), None);
        assert_eq!(coerce_bool(&json!([1])), None);
    }

    #[test]
    fn integer_coercion_accepts_numeric_strings() {
        assert_eq!(coerce_u32(&json!(40)), Some(40));
        assert_eq!(coerce_u32(&json!("25")), Some(25));
        assert_eq!(coerce_u32(&json!(" 5 ")), Some(5));
        assert_eq!(coerce_u32(&json!(-3)), None);
        assert_eq!(coerce_u32(&json!("five")), None);
    }

    #[test]
    fn list_coercion_accepts_scalar_and_comma_forms() {
        assert_eq!(
            coerce_string_list(&json!(["Hindi", "English"])),
            Some(vec!["Hindi".to_string(), "English".to_string()])
        );
        assert_eq!(
            coerce_string_list(&json!("Hindi, English")),
            Some(vec!["Hindi".to_string(), "English".to_string()])
        );
        assert_eq!(
            coerce_string_list(&json!("Punjabi")),
            Some(vec!["Punjabi".to_string()])
        );
        assert_eq!(coerce_string_list(&json!([])), None);
        assert_eq!(coerce_string_list(&json!(42)), None);
    }
}
