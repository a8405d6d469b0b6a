//! Schema validation for model replies.
//!
//! `FieldReader` walks a `serde_json::Value` alongside the typed record being built.
//! Every accessor returns a usable default on failure and records a `FieldViolation`,
//! so a single pass reports every offending field instead of stopping at the first.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

/// Why a single field failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// The reply text is not JSON at all.
    InvalidJson(String),
    /// Required field absent or null.
    Missing,
    /// Required text present but blank.
    Empty,
    /// Value cannot be coerced to the declared type.
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    /// A boolean field received a non-boolean value.
    BooleanCoercion { found: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Dotted path from the reply root, e.g. `enhanced_jd.compensation.visa_sponsorship`.
    pub path: String,
    pub kind: ViolationKind,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "<root>"
        } else {
            self.path.as_str()
        };
        match &self.kind {
            ViolationKind::InvalidJson(reason) => write!(f, "{path}: reply is not valid JSON ({reason})"),
            ViolationKind::Missing => write!(f, "{path}: field required"),
            ViolationKind::Empty => write!(f, "{path}: must not be empty"),
            ViolationKind::WrongType { expected, found } => {
                write!(f, "{path}: expected {expected}, found {found}")
            }
            ViolationKind::BooleanCoercion { found } => {
                write!(f, "{path}: expected a literal boolean, found {found}")
            }
        }
    }
}

/// A model reply that does not conform to its target schema.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{schema} validation failed with {} violation(s): {}", .violations.len(), render(.violations))]
pub struct SchemaValidationError {
    pub schema: &'static str,
    pub violations: Vec<FieldViolation>,
}

impl SchemaValidationError {
    /// The reply text could not be parsed as JSON.
    pub fn invalid_json(schema: &'static str, err: &serde_json::Error) -> Self {
        Self {
            schema,
            violations: vec![FieldViolation {
                path: String::new(),
                kind: ViolationKind::InvalidJson(err.to_string()),
            }],
        }
    }

    /// True when at least one violation is a boolean field holding a non-boolean.
    pub fn is_boolean_coercion(&self) -> bool {
        self.violations
            .iter()
            .any(|v| matches!(v.kind, ViolationKind::BooleanCoercion { .. }))
    }
}

fn render(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reads typed fields out of one JSON object, recording violations as it goes.
pub struct FieldReader<'a> {
    path: String,
    object: Option<&'a Map<String, Value>>,
    violations: &'a mut Vec<FieldViolation>,
}

impl<'a> FieldReader<'a> {
    /// Runs `read` over `value` and returns the record only if no violation was recorded.
    pub fn validate<T>(
        schema: &'static str,
        value: &Value,
        read: impl FnOnce(&mut FieldReader<'_>) -> T,
    ) -> Result<T, SchemaValidationError> {
        let mut violations = Vec::new();
        let object = match value {
            Value::Object(map) => Some(map),
            other => {
                violations.push(FieldViolation {
                    path: String::new(),
                    kind: ViolationKind::WrongType {
                        expected: "object",
                        found: type_name(other),
                    },
                });
                None
            }
        };

        let record = {
            let mut reader = FieldReader {
                path: String::new(),
                object,
                violations: &mut violations,
            };
            read(&mut reader)
        };

        if violations.is_empty() {
            Ok(record)
        } else {
            Err(SchemaValidationError { schema, violations })
        }
    }

    fn child_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    /// Null is treated the same as absent everywhere.
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.object
            .and_then(|map| map.get(key))
            .filter(|value| !value.is_null())
    }

    fn violation(&mut self, path: String, kind: ViolationKind) {
        self.violations.push(FieldViolation { path, kind });
    }

    /// Descends into a nested object. A missing optional record reads as all defaults.
    pub fn record(&mut self, key: &str, required: bool) -> FieldReader<'_> {
        let path = self.child_path(key);
        let object = match self.get(key) {
            Some(Value::Object(map)) => Some(map),
            Some(other) => {
                let found = type_name(other);
                self.violation(
                    path.clone(),
                    ViolationKind::WrongType {
                        expected: "object",
                        found,
                    },
                );
                None
            }
            None => {
                // A missing parent record has already been reported.
                if required && self.object.is_some() {
                    self.violation(path.clone(), ViolationKind::Missing);
                }
                None
            }
        };

        FieldReader {
            path,
            object,
            violations: &mut *self.violations,
        }
    }

    /// Mandatory, non-blank text.
    pub fn required_text(&mut self, key: &str) -> String {
        let path = self.child_path(key);
        match self.get(key) {
            None => {
                // A missing parent record has already been reported.
                if self.object.is_some() {
                    self.violation(path, ViolationKind::Missing);
                }
                String::new()
            }
            Some(value) => match coerce_text(value) {
                Some(text) if text.trim().is_empty() => {
                    self.violation(path, ViolationKind::Empty);
                    text
                }
                Some(text) => text,
                None => {
                    self.violation(
                        path,
                        ViolationKind::WrongType {
                            expected: "string",
                            found: type_name(value),
                        },
                    );
                    String::new()
                }
            },
        }
    }

    pub fn optional_text(&mut self, key: &str) -> Option<String> {
        let value = self.get(key)?;
        let text = coerce_text(value);
        if text.is_none() {
            let path = self.child_path(key);
            self.violation(
                path,
                ViolationKind::WrongType {
                    expected: "string",
                    found: type_name(value),
                },
            );
        }
        text
    }

    pub fn text_list(&mut self, key: &str) -> Vec<String> {
        let path = self.child_path(key);
        match self.get(key) {
            None => Vec::new(),
            Some(value) => read_text_list(value, path, self.violations),
        }
    }

    /// Object whose values are text lists, e.g. `skills_priority`.
    pub fn text_list_map(&mut self, key: &str) -> BTreeMap<String, Vec<String>> {
        let path = self.child_path(key);
        match self.get(key) {
            None => BTreeMap::new(),
            Some(Value::Object(map)) => map
                .iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(name, value)| {
                    let list = read_text_list(value, format!("{path}.{name}"), self.violations);
                    (name.clone(), list)
                })
                .collect(),
            Some(other) => {
                let found = type_name(other);
                self.violation(
                    path,
                    ViolationKind::WrongType {
                        expected: "object",
                        found,
                    },
                );
                BTreeMap::new()
            }
        }
    }

    /// Strict boolean. Absent reads as `false`; null, strings and numbers are violations.
    pub fn flag(&mut self, key: &str) -> bool {
        let path = self.child_path(key);
        match self.object.and_then(|map| map.get(key)) {
            None => false,
            Some(Value::Bool(flag)) => *flag,
            Some(other) => {
                let found = type_name(other);
                self.violation(path, ViolationKind::BooleanCoercion { found });
                false
            }
        }
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn read_text_list(value: &Value, path: String, violations: &mut Vec<FieldViolation>) -> Vec<String> {
    let Value::Array(items) = value else {
        violations.push(FieldViolation {
            path,
            kind: ViolationKind::WrongType {
                expected: "array",
                found: type_name(value),
            },
        });
        return Vec::new();
    };

    let mut list = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match coerce_text(item) {
            Some(text) => list.push(text),
            None => violations.push(FieldViolation {
                path: format!("{path}[{index}]"),
                kind: ViolationKind::WrongType {
                    expected: "string",
                    found: type_name(item),
                },
            }),
        }
    }
    list
}
