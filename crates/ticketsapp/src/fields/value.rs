//! Field value types.
//!
//! This module defines the runtime representation of a record field, used
//! both when reading a field through a [`Record`](super::Record) and when
//! expressing the value side of a filter criterion.

use std::fmt;

use chrono::{DateTime, Utc};

use super::FieldKind;

/// Runtime representation of a field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// An absent optional value (e.g. an unassigned ticket's `user_id`)
    Null,

    /// Integer value (identities, counters, foreign keys)
    Integer(i64),

    /// Free text (e.g. `title`, `email`)
    Text(String),

    /// Boolean flag (e.g. `is_assigned`)
    Bool(bool),

    /// Enum member by its canonical name (e.g. `"OPENED"`)
    Enum(String),

    /// Point in time
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// The kind this value belongs to, or `None` for `Null`.
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            FieldValue::Null => None,
            FieldValue::Integer(_) => Some(FieldKind::Integer),
            FieldValue::Text(_) => Some(FieldKind::Text),
            FieldValue::Bool(_) => Some(FieldKind::Bool),
            FieldValue::Enum(_) => Some(FieldKind::Enum),
            FieldValue::Timestamp(_) => Some(FieldKind::Timestamp),
        }
    }

    /// Textual content of a `Text` or `Enum` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Coerce a loosely typed value into the given field kind.
    ///
    /// Filter values arrive from the outside as text or JSON, so `"42"` is
    /// accepted for an integer field and `"opened"` for an enum field. Enum
    /// names are upper-cased; whether the member exists is up to the field.
    /// Returns `None` when the value cannot represent that kind.
    pub fn coerce(self, kind: FieldKind) -> Option<FieldValue> {
        match (kind, self) {
            (_, FieldValue::Null) => Some(FieldValue::Null),
            (FieldKind::Integer, FieldValue::Integer(v)) => Some(FieldValue::Integer(v)),
            (FieldKind::Integer, FieldValue::Text(s)) => {
                s.trim().parse().ok().map(FieldValue::Integer)
            }
            (FieldKind::Text, FieldValue::Text(s)) => Some(FieldValue::Text(s)),
            (FieldKind::Text, FieldValue::Enum(s)) => Some(FieldValue::Text(s)),
            (FieldKind::Text, FieldValue::Integer(v)) => Some(FieldValue::Text(v.to_string())),
            (FieldKind::Bool, FieldValue::Bool(v)) => Some(FieldValue::Bool(v)),
            (FieldKind::Bool, FieldValue::Text(s)) => match s.trim().to_ascii_lowercase().as_str()
            {
                "true" | "1" | "yes" => Some(FieldValue::Bool(true)),
                "false" | "0" | "no" => Some(FieldValue::Bool(false)),
                _ => None,
            },
            (FieldKind::Enum, FieldValue::Enum(s)) | (FieldKind::Enum, FieldValue::Text(s)) => {
                Some(FieldValue::Enum(s.trim().to_ascii_uppercase()))
            }
            (FieldKind::Timestamp, FieldValue::Timestamp(t)) => Some(FieldValue::Timestamp(t)),
            (FieldKind::Timestamp, FieldValue::Text(s)) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|t| FieldValue::Timestamp(t.with_timezone(&Utc))),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(v) => FieldValue::Integer(v),
                None => FieldValue::Text(n.to_string()),
            },
            serde_json::Value::String(s) => FieldValue::Text(s),
            other => FieldValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Text(s) | FieldValue::Enum(s) => write!(f, "{}", s),
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}
