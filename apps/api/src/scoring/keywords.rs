use serde_json::Value;
use tracing::warn;

/// Keywords persisted alongside a processed resume or job.
///
/// Ordered, de-duplicated (first occurrence wins), trimmed and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    /// Parses the stored blob. `entity` is `"resume"` or `"job"` and selects
    /// the `<entity>_keywords` key some older records use.
    ///
    /// Accepted shapes: a bare list, or an object holding the list under
    /// `extracted_keywords`, `keywords` or `<entity>_keywords`, possibly one
    /// level further down under `keywords`/`values`. Anything else is empty.
    pub fn from_blob(raw: Option<&str>, entity: &str) -> Self {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return Self::default();
        };

        let parsed: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(entity, error = %e, "failed to decode keywords payload");
                return Self::default();
            }
        };

        let entity_key = format!("{entity}_keywords");
        let mut candidate = match &parsed {
            Value::Object(map) => ["extracted_keywords", "keywords", entity_key.as_str()]
                .into_iter()
                .find_map(|key| map.get(key).filter(|v| is_truthy(v))),
            other => Some(other),
        };

        if let Some(Value::Object(inner)) = candidate {
            candidate = ["keywords", "values"]
                .into_iter()
                .find_map(|key| inner.get(key).filter(|v| is_truthy(v)));
        }

        match candidate {
            Some(Value::Array(items)) => Self::from_iter(items.iter().filter_map(Value::as_str)),
            Some(Value::Null) | None => Self::default(),
            Some(other) => {
                warn!(entity, shape = type_name(other), "unexpected keywords structure");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `", "`-joined form, used as embedding input and prompt text.
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }
}

impl<'a> FromIterator<&'a str> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut out: Vec<String> = Vec::new();
        for keyword in iter.into_iter().map(str::trim).filter(|k| !k.is_empty()) {
            if !out.iter().any(|seen| seen == keyword) {
                out.push(keyword.to_string());
            }
        }
        Self(out)
    }
}

/// Empty containers and strings fall through to the next candidate key.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Bool(true) => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
