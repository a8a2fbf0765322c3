//! # Storage Layer
//!
//! Persistence for the ticket system, in three layers:
//!
//! 1. [`backend::StorageBackend`]: raw table I/O, the only async boundary.
//! 2. [`repository::Repository`]: the in-memory working set of one entity
//!    type, with CRUD and the two filtering entry points.
//! 3. [`unit_of_work::UnitOfWork`]: owns the backend and one lazily loaded
//!    repository per entity type, and commits staged changes on demand.
//!
//! ## Staging
//!
//! Repository mutations never touch the backend. They mark the working set
//! dirty, and `save_changes` writes every dirty table. A failed commit
//! surfaces as `Persistence` and leaves the changes staged.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one JSON file per table, written atomically.
//! - [`mem_backend::MemBackend`]: for testing logic without filesystem I/O.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//! ├── tickets.json
//! ├── messages.json
//! ├── attachments.json
//! └── users.json
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::fields::Record;

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod repository;
pub mod unit_of_work;

pub use backend::StorageBackend;
pub use repository::{RemoveOutcome, Repository, TextMatches};
pub use unit_of_work::UnitOfWork;

/// A persisted record with a stable integer identity.
pub trait Entity: Record + Clone + Serialize + DeserializeOwned + 'static {
    /// Name of the table the records live in.
    const TABLE: &'static str;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);
}
