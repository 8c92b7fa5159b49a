use super::{Field, FieldType, Rule, Schema};
use crate::db::Insert;
use crate::services::ServiceError;
use anyhow::Context;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

const BODY_FIELD: &str = "body";

/// A single rule violation attributed to one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every violation found in one validation pass, in schema field order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    /// Error for a request body that is not a JSON object
    pub fn not_an_object() -> Self {
        Self::single(BODY_FIELD, "body must be a JSON object")
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Distinct field names with at least one violation
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for error in &self.errors {
            if !fields.contains(&error.field.as_str()) {
                fields.push(&error.field);
            }
        }
        fields
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Check `input` against `schema`.
///
/// Returns the normalized field map (strings trimmed, timestamps in RFC 3339,
/// unknown fields dropped) or every violation found.
pub fn validate(schema: &Schema, input: &Value) -> Result<Map<String, Value>, ValidationErrors> {
    let Some(object) = input.as_object() else {
        return Err(ValidationErrors::not_an_object());
    };

    let mut errors = ValidationErrors::default();
    let mut output = Map::new();

    for field in schema.fields {
        match check_field(field, object.get(field.name)) {
            Ok(Some(value)) => {
                output.insert(field.name.to_string(), value);
            },
            Ok(None) => {},
            Err(messages) => {
                for message in messages {
                    errors.push(field.name, message);
                }
            },
        }
    }

    if errors.is_empty() {
        Ok(output)
    } else {
        Err(errors)
    }
}

/// Validate `input` against `T::SCHEMA` and build the typed insert shape.
pub fn validate_into<T: Insert>(input: &Value) -> Result<T, ServiceError> {
    let fields = validate(T::SCHEMA, input).map_err(ServiceError::Validation)?;
    let insert = serde_json::from_value(Value::Object(fields)).with_context(|| {
        format!(
            "Failed to build {} from validated input",
            T::SCHEMA.kind.label()
        )
    })?;
    Ok(insert)
}

fn check_field(field: &Field, raw: Option<&Value>) -> Result<Option<Value>, Vec<String>> {
    let raw = match raw {
        None | Some(Value::Null) if field.required => {
            return Err(vec![format!("{} is required", field.name)]);
        },
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };

    match field.field_type {
        FieldType::Text => check_text(field, raw),
        FieldType::Integer => check_integer(field, raw),
        FieldType::Timestamp => check_timestamp(field, raw),
    }
}

fn check_text(field: &Field, raw: &Value) -> Result<Option<Value>, Vec<String>> {
    let Some(text) = raw.as_str() else {
        return Err(vec![format!("{} must be a string", field.name)]);
    };
    let text = text.trim();

    if text.is_empty() {
        if field.required {
            return Err(vec![format!("{} is required", field.name)]);
        }
        // Present-as-empty optional: kept, rules skipped
        return Ok(Some(Value::String(String::new())));
    }

    let failures: Vec<String> = field
        .rules
        .iter()
        .filter_map(|rule| text_rule(field.name, *rule, text))
        .collect();

    if failures.is_empty() {
        Ok(Some(Value::String(text.to_string())))
    } else {
        Err(failures)
    }
}

fn text_rule(name: &str, rule: Rule, text: &str) -> Option<String> {
    match rule {
        Rule::MinLength(min) if text.chars().count() < min => {
            Some(format!("{} must be at least {} characters", name, min))
        },
        Rule::Email if !EMAIL.is_match(text) => {
            Some(format!("{} must be a valid email address", name))
        },
        Rule::Url if !is_url(text) => Some(format!("{} must be a valid URL", name)),
        _ => None,
    }
}

fn is_url(text: &str) -> bool {
    if text.starts_with('/') {
        return !text.starts_with("//");
    }
    url::Url::parse(text)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}

fn check_integer(field: &Field, raw: &Value) -> Result<Option<Value>, Vec<String>> {
    let Some(number) = raw.as_i64() else {
        return Err(vec![format!("{} must be an integer", field.name)]);
    };

    if field.rules.contains(&Rule::Positive) && number <= 0 {
        return Err(vec![format!("{} must be a positive integer", field.name)]);
    }
    if number > i64::from(u32::MAX) || number < 0 {
        return Err(vec![format!("{} is out of range", field.name)]);
    }

    Ok(Some(Value::from(number)))
}

fn check_timestamp(field: &Field, raw: &Value) -> Result<Option<Value>, Vec<String>> {
    // A blank optional timestamp has no empty form, so it reads as absent
    if !field.required && raw.as_str().is_some_and(|s| s.trim().is_empty()) {
        return Ok(None);
    }

    let parsed = raw
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc));

    match parsed {
        Some(dt) => Ok(Some(Value::String(dt.to_rfc3339()))),
        None => Err(vec![format!("{} must be an RFC 3339 timestamp", field.name)]),
    }
}
