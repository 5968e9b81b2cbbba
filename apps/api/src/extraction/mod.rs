//! Structured extraction: raw LLM JSON in, typed documents out.
//!
//! Each schema is an explicit Rust type built field by field from a
//! `serde_json::Value`. Every failing field is collected (with its full path)
//! before returning, and a document with any failure is rejected wholesale.
//! Coercions that make LLM output usable live in `coerce`.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub mod coerce;
pub mod job;
pub mod preview;
pub mod resume;

pub use self::job::StructuredJob;
pub use self::preview::ResumePreview;
pub use self::resume::StructuredResume;

use self::coerce::{flat_string, string_list};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    Resume,
    Job,
    ResumePreview,
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SchemaKind::Resume => "structured_resume",
            SchemaKind::Job => "structured_job",
            SchemaKind::ResumePreview => "resume_preview",
        })
    }
}

/// One failing field, e.g. `Personal Data -> email: field required`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Debug, Clone, Error)]
#[error("{kind} validation failed: {}", self.details())]
pub struct ValidationError {
    pub kind: SchemaKind,
    pub field_errors: Vec<FieldError>,
}

impl ValidationError {
    /// All field errors joined into one human-readable line.
    pub fn details(&self) -> String {
        self.field_errors
            .iter()
            .map(FieldError::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StructuredDocument {
    Resume(StructuredResume),
    Job(StructuredJob),
    ResumePreview(ResumePreview),
}

impl StructuredDocument {
    pub fn kind(&self) -> SchemaKind {
        match self {
            StructuredDocument::Resume(_) => SchemaKind::Resume,
            StructuredDocument::Job(_) => SchemaKind::Job,
            StructuredDocument::ResumePreview(_) => SchemaKind::ResumePreview,
        }
    }
}

impl TryFrom<StructuredDocument> for StructuredResume {
    type Error = SchemaKind;

    fn try_from(doc: StructuredDocument) -> Result<Self, SchemaKind> {
        match doc {
            StructuredDocument::Resume(resume) => Ok(resume),
            other => Err(other.kind()),
        }
    }
}

impl TryFrom<StructuredDocument> for StructuredJob {
    type Error = SchemaKind;

    fn try_from(doc: StructuredDocument) -> Result<Self, SchemaKind> {
        match doc {
            StructuredDocument::Job(job) => Ok(job),
            other => Err(other.kind()),
        }
    }
}

impl TryFrom<StructuredDocument> for ResumePreview {
    type Error = SchemaKind;

    fn try_from(doc: StructuredDocument) -> Result<Self, SchemaKind> {
        match doc {
            StructuredDocument::ResumePreview(preview) => Ok(preview),
            other => Err(other.kind()),
        }
    }
}

/// Validates `raw` against the schema for `kind`.
pub fn validate(raw: &Value, kind: SchemaKind) -> Result<StructuredDocument, ValidationError> {
    match kind {
        SchemaKind::Resume => StructuredResume::from_value(raw).map(StructuredDocument::Resume),
        SchemaKind::Job => StructuredJob::from_value(raw).map(StructuredDocument::Job),
        SchemaKind::ResumePreview => {
            ResumePreview::from_value(raw).map(StructuredDocument::ResumePreview)
        }
    }
}

/// `validate` for callers that want the concrete document type. A document
/// of another kind is reported as a root-level error.
pub fn validate_as<T>(raw: &Value, kind: SchemaKind) -> Result<T, ValidationError>
where
    T: TryFrom<StructuredDocument, Error = SchemaKind>,
{
    T::try_from(validate(raw, kind)?).map_err(|held| ValidationError {
        kind,
        field_errors: vec![FieldError {
            path: FieldPath::root().to_string(),
            message: format!("expected {kind}, found {held}"),
        }],
    })
}

/// JSON schema for `T`, embedded in extraction prompts.
pub fn schema_of<T: schemars::JsonSchema>() -> Value {
    schemars::schema_for!(T).to_value()
}

// ────────────────────────────────────────────────────────────────────────────
// Field access with error collection
// ────────────────────────────────────────────────────────────────────────────

const FIELD_REQUIRED: &str = "field required";
const EXPECTED_STRING: &str = "input should be a valid string";
const EXPECTED_OBJECT: &str = "input should be a valid object";
const EXPECTED_LIST: &str = "input should be a valid list";

/// Collects field errors while a schema type is being built.
pub(crate) struct Validator {
    kind: SchemaKind,
    errors: Vec<FieldError>,
}

impl Validator {
    pub(crate) fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            errors: Vec::new(),
        }
    }

    pub(crate) fn fail(&mut self, path: &FieldPath, message: impl Into<String>) {
        self.errors.push(FieldError {
            path: path.to_string(),
            message: message.into(),
        });
    }

    /// Returns `value` only if nothing failed along the way.
    pub(crate) fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.reject())
        }
    }

    /// Gives up on the document; callers only reach this after a failure.
    pub(crate) fn reject(self) -> ValidationError {
        ValidationError {
            kind: self.kind,
            field_errors: self.errors,
        }
    }

    /// The document root must be a JSON object.
    pub(crate) fn root<'a>(&mut self, raw: &'a Value) -> Option<&'a Map<String, Value>> {
        let root = raw.as_object();
        if root.is_none() {
            self.fail(&FieldPath::root(), EXPECTED_OBJECT);
        }
        root
    }

    /// Required nested object.
    pub(crate) fn object<'a>(
        &mut self,
        parent: &'a Map<String, Value>,
        path: &FieldPath,
    ) -> Option<&'a Map<String, Value>> {
        match parent.get(path.leaf()) {
            None | Some(Value::Null) => {
                self.fail(path, FIELD_REQUIRED);
                None
            }
            Some(Value::Object(map)) => Some(map),
            Some(_) => {
                self.fail(path, EXPECTED_OBJECT);
                None
            }
        }
    }

    /// Optional nested object: absent/`null` is fine, any other type fails.
    pub(crate) fn optional_object<'a>(
        &mut self,
        parent: &'a Map<String, Value>,
        path: &FieldPath,
    ) -> Option<&'a Map<String, Value>> {
        match parent.get(path.leaf()) {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(_) => {
                self.fail(path, EXPECTED_OBJECT);
                None
            }
        }
    }

    /// Required list of objects; each element is handed to `build` with its
    /// indexed path. Non-object elements fail individually.
    pub(crate) fn objects<T>(
        &mut self,
        parent: &Map<String, Value>,
        path: &FieldPath,
        required: bool,
        mut build: impl FnMut(&mut Self, &Map<String, Value>, &FieldPath) -> T,
    ) -> Vec<T> {
        let items = match parent.get(path.leaf()) {
            None | Some(Value::Null) => {
                if required {
                    self.fail(path, FIELD_REQUIRED);
                }
                return Vec::new();
            }
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.fail(path, EXPECTED_LIST);
                return Vec::new();
            }
        };

        let mut built = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let item_path = path.index(index);
            match item.as_object() {
                Some(map) => built.push(build(self, map, &item_path)),
                None => self.fail(&item_path, EXPECTED_OBJECT),
            }
        }
        built
    }

    /// Required string with no coercion (trimmed).
    pub(crate) fn string(&mut self, parent: &Map<String, Value>, path: &FieldPath) -> String {
        match parent.get(path.leaf()) {
            None => {
                self.fail(path, FIELD_REQUIRED);
                String::new()
            }
            Some(Value::String(s)) => s.trim().to_string(),
            Some(_) => {
                self.fail(path, EXPECTED_STRING);
                String::new()
            }
        }
    }

    /// Key must be present but may be `null`.
    pub(crate) fn nullable_string(
        &mut self,
        parent: &Map<String, Value>,
        path: &FieldPath,
    ) -> Option<String> {
        match parent.get(path.leaf()) {
            None => {
                self.fail(path, FIELD_REQUIRED);
                None
            }
            Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.trim().to_string()),
            Some(_) => {
                self.fail(path, EXPECTED_STRING);
                None
            }
        }
    }

    /// Optional string with no coercion.
    pub(crate) fn optional_string(
        &mut self,
        parent: &Map<String, Value>,
        path: &FieldPath,
    ) -> Option<String> {
        match parent.get(path.leaf()) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.trim().to_string()),
            Some(_) => {
                self.fail(path, EXPECTED_STRING);
                None
            }
        }
    }

    /// Required key, coerced with `flat_string` (never fails once present).
    pub(crate) fn coerced_string(
        &mut self,
        parent: &Map<String, Value>,
        path: &FieldPath,
    ) -> String {
        match parent.get(path.leaf()) {
            None => {
                self.fail(path, FIELD_REQUIRED);
                String::new()
            }
            value => flat_string(value),
        }
    }

    /// Required key, coerced with `string_list`.
    pub(crate) fn coerced_list(
        &mut self,
        parent: &Map<String, Value>,
        path: &FieldPath,
    ) -> Vec<String> {
        match parent.get(path.leaf()) {
            None => {
                self.fail(path, FIELD_REQUIRED);
                Vec::new()
            }
            value => string_list(value),
        }
    }

    /// List whose elements must all be strings. Absent is an error only when
    /// `required`; `null` counts as empty.
    pub(crate) fn string_array(
        &mut self,
        parent: &Map<String, Value>,
        path: &FieldPath,
        required: bool,
    ) -> Vec<String> {
        match parent.get(path.leaf()) {
            None => {
                if required {
                    self.fail(path, FIELD_REQUIRED);
                }
                Vec::new()
            }
            Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    match item {
                        Value::String(s) => out.push(s.trim().to_string()),
                        _ => self.fail(&path.index(index), EXPECTED_STRING),
                    }
                }
                out
            }
            Some(_) => {
                self.fail(path, EXPECTED_LIST);
                Vec::new()
            }
        }
    }
}

/// Location of a field inside the document, rendered `A -> 0 -> b`.
#[derive(Debug, Clone, Default)]
pub(crate) struct FieldPath(Vec<String>);

impl FieldPath {
    pub(crate) fn root() -> Self {
        Self::default()
    }

    pub(crate) fn key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.to_string());
        Self(segments)
    }

    pub(crate) fn index(&self, index: usize) -> Self {
        self.key(&index.to_string())
    }

    fn leaf(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0.join(" -> "))
        }
    }
}
