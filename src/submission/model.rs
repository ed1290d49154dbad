//! Host-supplied submission inputs and the normalized form sent upstream.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::submission::ids::{FieldId, FieldKey, FormId};

/// A form's schema, as supplied by the host. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FormDefinition {
    pub id: FormId,
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// One answerable question of a form.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FieldDefinition {
    pub id: FieldId,
    #[serde(default)]
    pub label: String,
}

/// A single submission: answers keyed by field id, mixed with metadata keys.
///
/// Key order is the order of the source document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EntryRecord(Map<String, Value>);

impl EntryRecord {
    pub fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    /// Raw value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Keys and values in submission order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for EntryRecord {
    fn from(values: Map<String, Value>) -> Self {
        Self(values)
    }
}

/// The flat structure forwarded to the API and stored in the log.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NormalizedSubmission {
    pub form_id: FormId,
    pub form_title: String,
    pub date_created: String,
    pub ip: String,
    pub fields: Vec<SubmissionField>,
}

/// One answered field with its human-readable label.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SubmissionField {
    pub id: FieldKey,
    pub label: String,
    pub value: String,
}
