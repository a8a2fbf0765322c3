//! Field specifications and the record traits.
//!
//! Every record shape (entities and their projections) declares a closed
//! field enum plus a static table of [`FieldSpec`]s. The table is the single
//! source of truth for field names, kinds and the filterable marker; adding a
//! field means adding an enum variant and a table entry.

use std::fmt::Debug;
use std::hash::Hash;

use super::FieldValue;

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Integer,
    Text,
    Bool,
    /// Closed set of members, stored and compared by canonical name
    Enum,
    Timestamp,
}

impl FieldKind {
    /// Whether substring matching makes sense for this kind.
    pub fn is_textual(self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::Enum)
    }
}

/// Specification for a single field of a record shape.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec<F: Copy + 'static> {
    /// Typed identifier used for dispatch
    pub field: F,

    /// Name used at the API boundary (e.g. "title", "user_id")
    pub name: &'static str,

    pub kind: FieldKind,

    /// Whether the field may be absent (`FieldValue::Null`)
    pub nullable: bool,

    /// Whether the field takes part in named filters and free-text search
    pub filterable: bool,

    /// Canonical member names, for `Enum` fields
    pub members: &'static [&'static str],
}

impl<F: Copy + 'static> FieldSpec<F> {
    /// Create a new field spec with default flags (all false).
    pub const fn new(field: F, name: &'static str, kind: FieldKind) -> Self {
        Self {
            field,
            name,
            kind,
            nullable: false,
            filterable: false,
            members: &[],
        }
    }

    /// Create an `Enum` field spec with its canonical member names.
    pub const fn enumeration(field: F, name: &'static str, members: &'static [&'static str]) -> Self {
        let mut spec = Self::new(field, name, FieldKind::Enum);
        spec.members = members;
        spec
    }

    /// Set the filterable flag.
    pub const fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Set the nullable flag.
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Whether `value` is a member name of this `Enum` field.
    pub fn has_member(&self, value: &str) -> bool {
        self.members.iter().any(|m| *m == value)
    }
}

/// A shape whose fields can be read by typed identifier.
pub trait Record {
    type Field: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// Human-readable shape name, used in errors and logs.
    const NAME: &'static str;

    /// Field table in declaration order.
    const FIELDS: &'static [FieldSpec<Self::Field>];

    /// Read a field.
    fn get(&self, field: Self::Field) -> FieldValue;

    /// Look up a field spec by its boundary name (ASCII case-insensitive).
    fn field_named(name: &str) -> Option<&'static FieldSpec<Self::Field>> {
        Self::FIELDS
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(name))
    }

    /// Look up the spec of a typed field.
    fn spec_of(field: Self::Field) -> Option<&'static FieldSpec<Self::Field>> {
        Self::FIELDS.iter().find(|spec| spec.field == field)
    }
}

/// A shape that can be populated field by field (projection targets).
pub trait Assign: Record + Default {
    /// Write a field. Hands the value back when it does not fit the field.
    fn set(&mut self, field: Self::Field, value: FieldValue) -> Result<(), FieldValue>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Ticket, TicketField};

    #[test]
    fn ticket_table_has_expected_entries() {
        assert!(Ticket::field_named("title").is_some());
        assert!(Ticket::field_named("status").is_some());
        assert!(Ticket::field_named("user_id").is_some());
        assert!(Ticket::field_named("timestamp").is_some());
    }

    #[test]
    fn lookup_ignores_ascii_case() {
        let spec = Ticket::field_named("Title").unwrap();
        assert_eq!(spec.field, TicketField::Title);
    }

    #[test]
    fn unknown_field_returns_none() {
        assert!(Ticket::field_named("nonexistent").is_none());
    }

    #[test]
    fn status_spec_is_correct() {
        let spec = Ticket::spec_of(TicketField::Status).unwrap();
        assert_eq!(spec.name, "status");
        assert_eq!(spec.kind, FieldKind::Enum);
        assert!(spec.filterable);
        assert!(!spec.nullable);
        assert!(spec.has_member("OPENED"));
        assert!(!spec.has_member("opened"));
    }

    #[test]
    fn user_id_spec_is_nullable_and_not_filterable() {
        let spec = Ticket::spec_of(TicketField::UserId).unwrap();
        assert_eq!(spec.kind, FieldKind::Integer);
        assert!(spec.nullable);
        assert!(!spec.filterable);
    }

    #[test]
    fn textual_kinds() {
        assert!(FieldKind::Text.is_textual());
        assert!(FieldKind::Enum.is_textual());
        assert!(!FieldKind::Bool.is_textual());
        assert!(!FieldKind::Integer.is_textual());
        assert!(!FieldKind::Timestamp.is_textual());
    }
}
