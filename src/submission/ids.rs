//! Canonical identifiers for forms and fields.
//!
//! Hosts send identifiers as JSON numbers in some places and numeric strings
//! in others. Both sides of every comparison are parsed into `u64` first, so
//! `"3"` and `3` refer to the same field.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Numeric identifier of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FormId(pub u64);

/// Numeric identifier of a field within a form definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldId(pub u64);

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for FormId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LooseU64Visitor).map(FormId)
    }
}

impl<'de> Deserialize<'de> for FieldId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LooseU64Visitor).map(FieldId)
    }
}

/// Accepts `7`, `7.0` and `"7"` alike.
struct LooseU64Visitor;

impl Visitor<'_> for LooseU64Visitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
        u64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<u64, E> {
        if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
            Ok(v as u64)
        } else {
            Err(E::invalid_value(de::Unexpected::Float(v), &self))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
        v.trim()
            .parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

/// An entry key addressing a submitted answer.
///
/// Either a whole field (`"3"`) or one input of a multi-part field (`"3.2"`).
/// The field part is canonicalized (`"03"` becomes `3`) so it compares equal
/// to the numeric id in the form definition and is emitted as that number.
/// The input suffix is kept as written because `3.1` and `3.10` are
/// different inputs. A field part too large for a `u64` cannot name any
/// defined field and is treated like any other non-field key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldKey {
    field: FieldId,
    input: Option<String>,
}

impl FieldKey {
    /// Parse an entry key, returning `None` for metadata keys.
    pub fn parse(key: &str) -> Option<Self> {
        let (field, input) = match key.split_once('.') {
            Some((field, input)) => (field, Some(input)),
            None => (key, None),
        };

        if !is_digits(field) {
            return None;
        }
        if let Some(input) = input {
            if !is_digits(input) {
                return None;
            }
        }

        let field = FieldId(field.parse().ok()?);
        Some(Self {
            field,
            input: input.map(str::to_string),
        })
    }

    /// The field this key belongs to.
    pub fn field(&self) -> FieldId {
        self.field
    }

    /// Whether this key names a whole field, as opposed to one of its inputs.
    pub fn is_whole_field(&self) -> bool {
        self.input.is_none()
    }

    /// Identifier equality against a field definition.
    pub fn matches(&self, id: FieldId) -> bool {
        self.is_whole_field() && self.field == id
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.input {
            Some(input) => write!(f, "{}.{}", self.field, input),
            None => write!(f, "{}", self.field),
        }
    }
}

impl Serialize for FieldKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.input {
            None => serializer.serialize_u64(self.field.0),
            Some(_) => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for FieldKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldKeyVisitor;

        impl Visitor<'_> for FieldKeyVisitor {
            type Value = FieldKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a field number or a \"field.input\" string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<FieldKey, E> {
                Ok(FieldKey {
                    field: FieldId(v),
                    input: None,
                })
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<FieldKey, E> {
                LooseU64Visitor.visit_i64(v).map(|v| FieldKey {
                    field: FieldId(v),
                    input: None,
                })
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<FieldKey, E> {
                FieldKey::parse(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(FieldKeyVisitor)
    }
}
