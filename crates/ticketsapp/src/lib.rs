//! # Tickets
//!
//! The core of a support-ticket system: tickets raised by customers, the
//! messages exchanged on them, file attachments on messages, and the
//! support users tickets get assigned to.
//!
//! ## Layers
//!
//! - [`fields`]: the per-type field registry and the predicate builder that
//!   turns a field name, a value and an operator into a typed test
//! - [`store`]: backends, the generic filterable [`store::Repository`] and the
//!   [`store::UnitOfWork`] that stages and commits changes
//! - [`mapper`]: validated structural copies between record shapes
//! - [`commands`]: the services, including the multi-criterion ticket search
//! - [`api`]: the facade every UI goes through
//!
//! ## Filtering
//!
//! Only fields registered as filterable can be filtered on. Lookup by name
//! ignores ASCII case. `equals` works on every kind; `contains` is a
//! case-insensitive substring test on textual fields. Free-text search ORs a
//! `contains` test over every textual filterable field.

pub mod api;
pub mod commands;
pub mod config;
pub mod dto;
pub mod error;
pub mod fields;
pub mod mapper;
pub mod model;
pub mod store;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
