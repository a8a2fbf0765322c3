//! Field filtering.
//!
//! A filter arrives as data: a field name, an operator and a value. This
//! module resolves the name against the record's field table and compiles the
//! triple into a [`Predicate`] that can be applied to any record of that type.
//!
//! Compilation is where requests are rejected. An unknown or non-filterable
//! field, `contains` on a non-textual field, and a value that cannot be read
//! as the field's kind all fail here, so evaluation itself never errors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{FieldSpec, FieldValue, Record};
use crate::error::{Result, TicketsError};

/// Filter operation applied to a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    /// Exact match after coercing the value to the field's kind.
    Equals,
    /// Case-insensitive substring match, textual fields only.
    #[default]
    Contains,
}

impl FromStr for FilterOp {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equals" | "eq" => Ok(FilterOp::Equals),
            "contains" => Ok(FilterOp::Contains),
            other => Err(format!("unknown filter type `{}`", other)),
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOp::Equals => write!(f, "equals"),
            FilterOp::Contains => write!(f, "contains"),
        }
    }
}

/// A filter criterion in data form.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    /// Boundary name of the field (e.g. "status")
    pub field: String,
    pub op: FilterOp,
    pub value: FieldValue,
}

impl Criterion {
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Convenience: create an equality criterion.
    pub fn equals(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::new(field, FilterOp::Equals, value)
    }

    /// Convenience: create a substring criterion.
    pub fn contains(field: impl Into<String>, needle: &str) -> Self {
        Self::new(field, FilterOp::Contains, needle)
    }

    /// Compile against the field table of `R`.
    pub fn compile<R: Record>(&self) -> Result<Predicate<R>> {
        Predicate::build(&self.field, self.value.clone(), self.op)
    }
}

enum Test {
    Equals(FieldValue),
    /// Lower-cased needle
    Contains(String),
}

/// A compiled, type-checked filter over records of type `R`.
pub struct Predicate<R: Record> {
    spec: &'static FieldSpec<R::Field>,
    test: Test,
}

impl<R: Record> Predicate<R> {
    /// Resolve `field_name` and compile the criterion.
    ///
    /// Fails with `UnknownField` when the name does not denote a filterable
    /// field of `R` or when `contains` targets a non-textual field, and with
    /// `InvalidFilterValue` when `value` cannot be read as the field's kind.
    pub fn build(field_name: &str, value: FieldValue, op: FilterOp) -> Result<Self> {
        let spec = R::field_named(field_name)
            .filter(|spec| spec.filterable)
            .ok_or_else(|| TicketsError::unknown_field(R::NAME, field_name))?;
        Self::for_spec(spec, value, op)
    }

    /// Compile a criterion against an already resolved field.
    pub(crate) fn for_spec(
        spec: &'static FieldSpec<R::Field>,
        value: FieldValue,
        op: FilterOp,
    ) -> Result<Self> {
        let invalid = |value: &FieldValue| TicketsError::InvalidFilterValue {
            record: R::NAME,
            field: spec.name.to_string(),
            value: value.to_string(),
        };

        let test = match op {
            FilterOp::Equals => {
                let coerced = value.clone().coerce(spec.kind).ok_or_else(|| invalid(&value))?;
                match &coerced {
                    FieldValue::Null if !spec.nullable => return Err(invalid(&value)),
                    FieldValue::Enum(name) if !spec.has_member(name) => {
                        return Err(invalid(&value))
                    }
                    _ => {}
                }
                Test::Equals(coerced)
            }
            FilterOp::Contains => {
                if !spec.kind.is_textual() {
                    return Err(TicketsError::not_textual(R::NAME, spec.name));
                }
                let needle = match &value {
                    FieldValue::Text(s) | FieldValue::Enum(s) => s.to_lowercase(),
                    FieldValue::Integer(v) => v.to_string(),
                    _ => return Err(invalid(&value)),
                };
                Test::Contains(needle)
            }
        };

        Ok(Self { spec, test })
    }

    /// The field this predicate reads.
    pub fn field(&self) -> &'static FieldSpec<R::Field> {
        self.spec
    }

    pub fn matches(&self, record: &R) -> bool {
        let actual = record.get(self.spec.field);
        match &self.test {
            Test::Equals(expected) => actual == *expected,
            Test::Contains(needle) => actual
                .as_text()
                .map(|text| text.to_lowercase().contains(needle.as_str()))
                .unwrap_or(false),
        }
    }
}

/// Substring predicate over a textual field, used by free-text search.
pub(crate) fn text_predicate<R: Record>(
    spec: &'static FieldSpec<R::Field>,
    needle: &str,
) -> Option<Predicate<R>> {
    if !spec.kind.is_textual() {
        return None;
    }
    Some(Predicate {
        spec,
        test: Test::Contains(needle.to_lowercase()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Status, Ticket};

    fn ticket(title: &str, status: Status) -> Ticket {
        let mut t = Ticket::new(title, "Ann", "ann@example.com");
        t.status = status;
        t
    }

    #[test]
    fn equals_on_enum_accepts_any_case() {
        let p = Predicate::<Ticket>::build("status", "opened".into(), FilterOp::Equals).unwrap();
        assert!(p.matches(&ticket("a", Status::Opened)));
        assert!(!p.matches(&ticket("a", Status::Pending)));
    }

    #[test]
    fn equals_on_enum_rejects_unknown_member() {
        let err = Predicate::<Ticket>::build("status", "CLOSED".into(), FilterOp::Equals);
        assert!(matches!(err, Err(TicketsError::InvalidFilterValue { .. })));
    }

    #[test]
    fn equals_on_bool_coerces_text() {
        let p = Predicate::<Ticket>::build("is_assigned", "true".into(), FilterOp::Equals).unwrap();
        let mut t = ticket("a", Status::Pending);
        assert!(!p.matches(&t));
        t.is_assigned = true;
        assert!(p.matches(&t));
    }

    #[test]
    fn contains_is_case_insensitive() {
        let p = Predicate::<Ticket>::build("title", "PRINTER".into(), FilterOp::Contains).unwrap();
        assert!(p.matches(&ticket("The printer is on fire", Status::Pending)));
        assert!(!p.matches(&ticket("Network down", Status::Pending)));
    }

    #[test]
    fn contains_on_enum_matches_canonical_name() {
        let p = Predicate::<Ticket>::build("priority", "hig".into(), FilterOp::Contains).unwrap();
        let mut t = ticket("a", Status::Pending);
        t.priority = Priority::Highest;
        assert!(p.matches(&t));
    }

    #[test]
    fn contains_on_bool_is_rejected() {
        let err = Predicate::<Ticket>::build("is_assigned", "t".into(), FilterOp::Contains);
        assert!(matches!(err, Err(TicketsError::UnknownField { .. })));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = Predicate::<Ticket>::build("color", "red".into(), FilterOp::Equals);
        assert!(matches!(err, Err(TicketsError::UnknownField { .. })));
    }

    #[test]
    fn non_filterable_field_is_rejected() {
        let err = Predicate::<Ticket>::build("user_id", 5.into(), FilterOp::Equals);
        assert!(matches!(err, Err(TicketsError::UnknownField { .. })));
    }

    #[test]
    fn criterion_compiles_with_case_insensitive_name() {
        let p = Criterion::contains("Email", "EXAMPLE").compile::<Ticket>().unwrap();
        assert_eq!(p.field().name, "email");
        assert!(p.matches(&ticket("a", Status::Pending)));
    }

    #[test]
    fn filter_op_parses_and_defaults() {
        assert_eq!("Equals".parse::<FilterOp>(), Ok(FilterOp::Equals));
        assert_eq!("contains".parse::<FilterOp>(), Ok(FilterOp::Contains));
        assert!("like".parse::<FilterOp>().is_err());
        assert_eq!(FilterOp::default(), FilterOp::Contains);
    }
}
