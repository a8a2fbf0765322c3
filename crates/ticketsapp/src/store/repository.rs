use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::Entity;
use crate::error::{Result, TicketsError};
use crate::fields::{filterable_fields, text_predicate, FieldValue, FilterOp, Predicate};

/// Outcome of [`Repository::remove`].
///
/// Removing a missing identity is not an error: the outcome carries the
/// reason in `errors` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveOutcome {
    pub id: i64,
    pub errors: Vec<String>,
}

impl RemoveOutcome {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Result of a free-text search.
#[derive(Debug)]
pub struct TextMatches<'a, E> {
    /// Matching records in storage order, each at most once
    pub items: Vec<&'a E>,
    /// Number of registered fields on which at least one record matched
    pub matched_field_count: usize,
}

/// Working set of one entity type.
///
/// Holds the rows in storage order. Mutations only touch the working set and
/// mark it dirty; the owning unit of work writes it back on commit.
#[derive(Debug, Clone)]
pub struct Repository<E: Entity> {
    rows: Vec<E>,
    /// Highest identity ever held, 0 for none
    last_id: i64,
    dirty: bool,
}

impl<E: Entity> Default for Repository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Repository<E> {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            last_id: 0,
            dirty: false,
        }
    }

    /// Build a working set from rows already in storage order.
    pub fn from_rows(rows: Vec<E>) -> Self {
        let last_id = rows.iter().map(Entity::id).max().unwrap_or(0).max(0);
        Self {
            rows,
            last_id,
            dirty: false,
        }
    }

    /// Build a working set from a stored table (`None` means empty).
    pub(crate) fn from_table(table: Option<Value>) -> Result<Self> {
        let rows: Vec<E> = match table {
            Some(value) => serde_json::from_value(value)?,
            None => Vec::new(),
        };
        debug!(table = E::TABLE, rows = rows.len(), "Loaded table");
        Ok(Self::from_rows(rows))
    }

    pub(crate) fn to_table(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.rows)?)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    fn not_found(id: i64) -> TicketsError {
        TicketsError::NotFound {
            record: E::NAME,
            id,
        }
    }

    /// Stage a new record and return it with its identity.
    ///
    /// A zero id gets the next free identity. A caller-chosen id is kept,
    /// unless it is negative (`Invalid`) or already taken (`Persistence`).
    /// Once `i64::MAX` has been handed out, automatic identities fail with
    /// `Persistence`.
    pub fn add(&mut self, mut entity: E) -> Result<E> {
        match entity.id() {
            0 => {
                let id = self.last_id.checked_add(1).ok_or_else(|| {
                    TicketsError::Persistence(format!("{} identities exhausted", E::NAME))
                })?;
                entity.set_id(id);
            }
            id if id < 0 => {
                return Err(TicketsError::Invalid {
                    record: E::NAME,
                    reason: format!("negative id {}", id),
                });
            }
            id if self.position(id).is_some() => {
                return Err(TicketsError::Persistence(format!(
                    "duplicate {} id {}",
                    E::NAME,
                    id
                )));
            }
            _ => {}
        }

        self.last_id = self.last_id.max(entity.id());
        self.rows.push(entity.clone());
        self.dirty = true;
        Ok(entity)
    }

    pub fn get(&self, id: i64) -> Result<&E> {
        self.rows
            .iter()
            .find(|row| row.id() == id)
            .ok_or_else(|| Self::not_found(id))
    }

    /// All records in storage order. Each call starts a fresh pass.
    pub fn get_all(&self) -> impl Iterator<Item = &E> + '_ {
        self.rows.iter()
    }

    /// Replace the stored record that has the same identity.
    pub fn update(&mut self, entity: E) -> Result<()> {
        let index = self
            .position(entity.id())
            .ok_or_else(|| Self::not_found(entity.id()))?;
        self.rows[index] = entity;
        self.dirty = true;
        Ok(())
    }

    /// Remove a record. Never fails; a missing identity is reported in the outcome.
    pub fn remove(&mut self, id: i64) -> RemoveOutcome {
        match self.position(id) {
            Some(index) => {
                self.rows.remove(index);
                self.dirty = true;
                RemoveOutcome {
                    id,
                    errors: Vec::new(),
                }
            }
            None => {
                warn!(record = E::NAME, id, "Remove of missing record");
                RemoveOutcome {
                    id,
                    errors: vec![Self::not_found(id).to_string()],
                }
            }
        }
    }

    pub fn any(&self, predicate: impl Fn(&E) -> bool) -> bool {
        self.rows.iter().any(predicate)
    }

    /// First match in storage order, `None` when nothing matches.
    pub fn get_first(&self, predicate: impl Fn(&E) -> bool) -> Option<&E> {
        self.rows.iter().find(|&row| predicate(row))
    }

    /// Every match in storage order.
    pub fn find<'a>(
        &'a self,
        predicate: impl Fn(&E) -> bool + 'a,
    ) -> impl Iterator<Item = &'a E> + 'a {
        self.rows.iter().filter(move |&row| predicate(row))
    }

    /// Records whose named field satisfies `op` against `value`.
    ///
    /// The field is identified by its boundary name because filter requests
    /// arrive as data. Fails with `UnknownField` when the name is not a
    /// filterable field of `E`.
    pub fn get_filtered(
        &self,
        field_name: &str,
        value: FieldValue,
        op: FilterOp,
    ) -> Result<impl Iterator<Item = &E> + '_> {
        let predicate = Predicate::<E>::build(field_name, value, op)?;
        debug!(
            record = E::NAME,
            field = predicate.field().name,
            %op,
            "Filtering by field"
        );
        Ok(self.rows.iter().filter(move |&row| predicate.matches(row)))
    }

    /// Records where `text` appears, case-insensitively, in any registered
    /// textual field.
    pub fn get_filtered_text(&self, text: &str) -> TextMatches<'_, E> {
        let predicates: Vec<Predicate<E>> = filterable_fields::<E>()
            .iter()
            .filter_map(|spec| text_predicate(*spec, text))
            .collect();

        let mut hits = vec![false; predicates.len()];
        let mut items = Vec::new();
        for row in &self.rows {
            let mut matched = false;
            for (i, predicate) in predicates.iter().enumerate() {
                if predicate.matches(row) {
                    hits[i] = true;
                    matched = true;
                }
            }
            if matched {
                items.push(row);
            }
        }

        let matched_field_count = hits.iter().filter(|hit| **hit).count();
        debug!(
            record = E::NAME,
            matches = items.len(),
            matched_field_count,
            "Free-text search"
        );
        TextMatches {
            items,
            matched_field_count,
        }
    }
}
