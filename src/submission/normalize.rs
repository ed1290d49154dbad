//! Entry + form definition → `NormalizedSubmission`.

use serde_json::Value;
use thiserror::Error;

use crate::submission::ids::FieldKey;
use crate::submission::model::{EntryRecord, FormDefinition, NormalizedSubmission, SubmissionField};

/// Separator for multi-value answers (checkboxes, multi-selects).
pub const MULTI_VALUE_SEPARATOR: &str = ", ";

/// The host broke its side of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("entry is missing required key '{0}'")]
    MissingKey(&'static str),

    #[error("entry key '{0}' must be a string or number")]
    NotScalar(&'static str),
}

/// Build the forwarded representation of one submission.
///
/// Pure: the same entry and form always produce the same output.
pub fn normalize(
    entry: &EntryRecord,
    form: &FormDefinition,
) -> Result<NormalizedSubmission, NormalizeError> {
    let date_created = required_metadata(entry, "date_created")?;
    let ip = required_metadata(entry, "ip")?;

    let mut fields = Vec::new();
    for (key, value) in entry.iter() {
        let Some(field_key) = FieldKey::parse(key) else {
            continue;
        };
        if is_empty(value) {
            continue;
        }

        let value = render_value(value);
        if value.is_empty() {
            continue;
        }

        let label = form
            .fields
            .iter()
            .find(|field| field_key.matches(field.id))
            .map(|field| field.label.clone())
            .unwrap_or_else(|| format!("Field {}", field_key));

        fields.push(SubmissionField {
            id: field_key,
            label,
            value,
        });
    }

    Ok(NormalizedSubmission {
        form_id: form.id,
        form_title: form.title.clone(),
        date_created,
        ip,
        fields,
    })
}

fn required_metadata(entry: &EntryRecord, key: &'static str) -> Result<String, NormalizeError> {
    match entry.get(key) {
        None | Some(Value::Null) => Err(NormalizeError::MissingKey(key)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(NormalizeError::NotScalar(key)),
    }
}

/// Blank answers as the host reports them: nothing, `false`, `""`, `"0"`, zero
/// or an empty list.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty() || s == "0",
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(render_scalar)
            .collect::<Vec<_>>()
            .join(MULTI_VALUE_SEPARATOR),
        other => render_scalar(other),
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}
