//! # Fields
//!
//! Records (entities and their projections) expose their fields through a
//! closed, per-type field enum and a static table of [`FieldSpec`]s instead of
//! runtime reflection. Everything that addresses a field by name goes through
//! that table.
//!
//! ## Pieces
//!
//! - [`FieldValue`]: runtime value of a field, also the value side of a filter
//! - [`FieldSpec`], [`Record`], [`Assign`]: field tables and typed accessors
//! - [`Predicate`], [`Criterion`], [`FilterOp`]: filters compiled from
//!   `(name, value, operator)` triples arriving as data
//! - [`filterable_fields`]: the per-type list of fields eligible for free-text
//!   search, computed once and cached
//!
//! ## Example
//!
//! ```ignore
//! let p = Predicate::<Ticket>::build("status", "opened".into(), FilterOp::Equals)?;
//! let open: Vec<_> = tickets.iter().filter(|t| p.matches(t)).collect();
//! ```

mod filter;
mod registry;
mod spec;
mod value;

pub use filter::{Criterion, FilterOp, Predicate};
pub(crate) use filter::text_predicate;
pub use registry::{filterable_fields, filterable_names};
pub use spec::{Assign, FieldKind, FieldSpec, Record};
pub use value::FieldValue;
