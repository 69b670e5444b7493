//! Candidate intake form schema.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::types::{string_or_number, RecordId};
use crate::validation::validate_unique_ids;

/// Input widget used for an intake field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Textarea,
    Radio,
}

/// One entry of the ordered intake form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    #[serde(deserialize_with = "string_or_number")]
    pub id: RecordId,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    /// Choices for `radio` fields.
    #[serde(
        default,
        deserialize_with = "options_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub options: Option<Vec<String>>,
}

/// Schema written on first access: a single required name field.
pub fn default_form_schema() -> Vec<FormField> {
    vec![FormField {
        id: "name".into(),
        label: "Name".into(),
        kind: FieldKind::Text,
        required: true,
        options: None,
    }]
}

/// Validate a full replacement schema.
pub fn validate_form_schema(fields: &[FormField]) -> Result<(), CoreError> {
    for field in fields {
        if field.label.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Form field '{}' must have a label",
                field.id
            )));
        }
        if field.kind == FieldKind::Radio
            && field.options.as_ref().map_or(true, |o| o.is_empty())
        {
            return Err(CoreError::Validation(format!(
                "Radio field '{}' requires at least one option",
                field.id
            )));
        }
    }
    validate_unique_ids(fields.iter().map(|f| f.id.as_str()), "form field")
}

/// Check that every required field has a non-blank answer.
pub fn validate_candidate_info(
    schema: &[FormField],
    info: &IndexMap<String, serde_json::Value>,
) -> Result<(), CoreError> {
    for field in schema.iter().filter(|f| f.required) {
        let answered = match info.get(&field.id) {
            Some(serde_json::Value::String(s)) => !s.trim().is_empty(),
            Some(serde_json::Value::Null) | None => false,
            Some(_) => true,
        };
        if !answered {
            return Err(CoreError::Validation(format!(
                "Required field '{}' is missing",
                field.label
            )));
        }
    }
    Ok(())
}

/// Accept options either as a JSON list or as a comma-separated string.
fn options_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Csv(String),
    }

    let parsed = match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::List(items)) => Some(items),
        Some(Raw::Csv(s)) => Some(
            s.split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
        ),
    };
    Ok(parsed)
}
