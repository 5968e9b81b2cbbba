//! Coercion rules shared by every schema. LLMs routinely return a list where
//! a string was asked for (or the reverse); these functions normalize such
//! values instead of rejecting the whole document.

use serde_json::Value;

/// Text form of any JSON value: strings verbatim, everything else as
/// compact JSON (`42`, `true`, `["a","b"]`).
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Flat string field: absent/`null` ⇒ `""`, rich value ⇒ compact JSON, trimmed.
pub fn flat_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(v) => value_text(v).trim().to_string(),
    }
}

/// Like `flat_string`, but blank collapses to `None`.
pub fn optional_string(value: Option<&Value>) -> Option<String> {
    Some(flat_string(value)).filter(|s| !s.is_empty())
}

/// List-of-strings field: a lone string becomes a singleton (or nothing if
/// blank); list elements are stringified and trimmed, blanks dropped.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| flat_string(Some(item)))
            .filter(|s| !s.is_empty())
            .collect(),
        Some(other) => {
            let text = value_text(other).trim().to_string();
            if text.is_empty() {
                Vec::new()
            } else {
                vec![text]
            }
        }
    }
}

/// Closed-set field: case-insensitive match on the canonical label.
/// Unknown or non-string input degrades to the `NOT_SPECIFIED` member.
pub trait LenientEnum: Sized + Copy + 'static {
    const ALL: &'static [Self];
    const NOT_SPECIFIED: Self;

    fn label(self) -> &'static str;

    fn coerce(value: Option<&Value>) -> Self {
        value
            .and_then(Value::as_str)
            .map(str::trim)
            .and_then(|raw| {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|member| member.label().eq_ignore_ascii_case(raw))
            })
            .unwrap_or(Self::NOT_SPECIFIED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_string_absent_and_null_are_empty() {
        assert_eq!(flat_string(None), "");
        assert_eq!(flat_string(Some(&Value::Null)), "");
    }

    #[test]
    fn test_flat_string_serializes_rich_values_compactly() {
        assert_eq!(flat_string(Some(&json!(["Berlin", "Remote"]))), r#"["Berlin","Remote"]"#);
        assert_eq!(flat_string(Some(&json!({"city": "Oslo"}))), r#"{"city":"Oslo"}"#);
        assert_eq!(flat_string(Some(&json!(2024))), "2024");
        assert_eq!(flat_string(Some(&json!("  Acme  "))), "Acme");
    }

    #[test]
    fn test_optional_string_blank_is_none() {
        assert_eq!(optional_string(Some(&json!("   "))), None);
        assert_eq!(optional_string(None), None);
        assert_eq!(optional_string(Some(&json!("x"))), Some("x".to_string()));
    }

    #[test]
    fn test_string_list_wraps_single_string() {
        assert_eq!(string_list(Some(&json!("Led team"))), vec!["Led team"]);
        assert!(string_list(Some(&json!("  "))).is_empty());
    }

    #[test]
    fn test_string_list_stringifies_and_drops_blanks() {
        let raw = json!([" Rust ", 3, "", null, {"k": "v"}]);
        assert_eq!(
            string_list(Some(&raw)),
            vec!["Rust", "3", r#"{"k":"v"}"#]
        );
    }
}
