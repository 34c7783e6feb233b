//! Request validation for the essay endpoint
//!
//! Turns an untyped JSON payload into an [`EssayFeedbackRequest`] or a
//! flattened list of per-field problems. All rules are checked on every call
//! so a client sees every failing field at once; nothing is accepted
//! partially.

use crate::types::{EssayFeedbackRequest, EssayType, Language, UnitId};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Minimum essay length after trimming, in UTF-16 code units
///
/// Counting code units keeps the threshold identical to the browser's
/// `String.length`, so an emoji counts as two.
pub const MIN_ESSAY_CHARS: usize = 50;

const FIELD_LANGUAGE: &str = "language";
const FIELD_UNIT_ID: &str = "unitId";
const FIELD_ESSAY_TYPE: &str = "essayType";
const FIELD_ESSAY_TEXT: &str = "essayText";

/// Flattened validation diagnostics
///
/// Serializes as `{"formErrors": [...], "fieldErrors": {"unitId": [...]}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrors {
    /// Problems with the payload as a whole
    pub form_errors: Vec<String>,
    /// Problems keyed by wire field name
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.is_empty()
    }

    /// Messages recorded for `field`, empty when the field passed
    pub fn field(&self, field: &str) -> &[String] {
        self.field_errors
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.field_errors.contains_key(field)
    }

    fn push_form(&mut self, message: impl Into<String>) {
        self.form_errors.push(message.into());
    }

    fn push_field(&mut self, field: &str, message: impl Into<String>) {
        self.field_errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = self.form_errors.clone();
        for (field, messages) in &self.field_errors {
            parts.push(format!("{}: {}", field, messages.join(", ")));
        }
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a raw payload
pub fn validate_request(payload: &Value) -> Result<EssayFeedbackRequest, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let Some(fields) = payload.as_object() else {
        errors.push_form(format!("Expected object, received {}", kind_of(payload)));
        return Err(errors);
    };

    let language = check_language(fields, &mut errors);
    let unit_id = check_unit_id(fields, &mut errors);
    let essay_type = check_essay_type(fields, &mut errors);
    let essay_text = check_essay_text(fields, &mut errors);

    match (language, unit_id, essay_type, essay_text) {
        (Some(language), Some(unit_id), Some(essay_type), Some(essay_text))
            if errors.is_empty() =>
        {
            Ok(EssayFeedbackRequest {
                language,
                unit_id,
                essay_type,
                essay_text,
            })
        }
        _ => Err(errors),
    }
}

/// Absent means English; anything present must be a known code
fn check_language(fields: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<Language> {
    match fields.get(FIELD_LANGUAGE) {
        None => Some(Language::default()),
        Some(Value::String(code)) => Language::from_code(code).or_else(|| {
            errors.push_field(
                FIELD_LANGUAGE,
                format!("Invalid enum value. Expected 'en' | 'es', received '{}'", code),
            );
            None
        }),
        Some(other) => {
            errors.push_field(
                FIELD_LANGUAGE,
                format!("Expected 'en' | 'es', received {}", kind_of(other)),
            );
            None
        }
    }
}

fn check_unit_id(fields: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<UnitId> {
    let value = match fields.get(FIELD_UNIT_ID) {
        None => {
            errors.push_field(FIELD_UNIT_ID, "Required");
            return None;
        }
        Some(Value::Number(n)) => n,
        Some(other) => {
            errors.push_field(
                FIELD_UNIT_ID,
                format!("Expected number, received {}", kind_of(other)),
            );
            return None;
        }
    };

    // 3.0 is still an integer; 3.5 is not. Range checks still run after an
    // integer failure so 10.5 reports both problems.
    let as_float = value.as_f64().unwrap_or(f64::NAN);
    let mut valid = true;
    if as_float.fract() != 0.0 || !as_float.is_finite() {
        errors.push_field(FIELD_UNIT_ID, "Expected integer, received float");
        valid = false;
    }

    if as_float < f64::from(UnitId::MIN) {
        errors.push_field(
            FIELD_UNIT_ID,
            format!("Number must be greater than or equal to {}", UnitId::MIN),
        );
        valid = false;
    }
    if as_float > f64::from(UnitId::MAX) {
        errors.push_field(
            FIELD_UNIT_ID,
            format!("Number must be less than or equal to {}", UnitId::MAX),
        );
        valid = false;
    }

    if !valid {
        return None;
    }
    UnitId::new(as_float as u8)
}

fn check_essay_type(fields: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<EssayType> {
    match fields.get(FIELD_ESSAY_TYPE) {
        None => {
            errors.push_field(FIELD_ESSAY_TYPE, "Required");
            None
        }
        Some(Value::String(code)) => EssayType::from_code(code).or_else(|| {
            errors.push_field(
                FIELD_ESSAY_TYPE,
                format!(
                    "Invalid enum value. Expected 'SAQ' | 'LEQ' | 'DBQ', received '{}'",
                    code
                ),
            );
            None
        }),
        Some(other) => {
            errors.push_field(
                FIELD_ESSAY_TYPE,
                format!("Expected 'SAQ' | 'LEQ' | 'DBQ', received {}", kind_of(other)),
            );
            None
        }
    }
}

fn check_essay_text(fields: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<String> {
    match fields.get(FIELD_ESSAY_TEXT) {
        None => {
            errors.push_field(FIELD_ESSAY_TEXT, "Required");
            None
        }
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.encode_utf16().count() < MIN_ESSAY_CHARS {
                errors.push_field(
                    FIELD_ESSAY_TEXT,
                    format!(
                        "String must contain at least {} character(s)",
                        MIN_ESSAY_CHARS
                    ),
                );
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(other) => {
            errors.push_field(
                FIELD_ESSAY_TEXT,
                format!("Expected string, received {}", kind_of(other)),
            );
            None
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
