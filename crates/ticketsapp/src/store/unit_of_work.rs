use std::any::{Any, TypeId};
use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::backend::StorageBackend;
use super::repository::Repository;
use super::Entity;
use crate::error::{Result, TicketsError};
use crate::model::{Attachment, Message, Ticket, User};

/// Type-erased view of a staged repository.
trait StagedTable {
    fn table(&self) -> &'static str;
    fn is_dirty(&self) -> bool;
    fn snapshot(&self) -> Result<Value>;
    fn mark_clean(&mut self);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<E: Entity> StagedTable for Repository<E> {
    fn table(&self) -> &'static str {
        E::TABLE
    }

    fn is_dirty(&self) -> bool {
        Repository::is_dirty(self)
    }

    fn snapshot(&self) -> Result<Value> {
        self.to_table()
    }

    fn mark_clean(&mut self) {
        Repository::mark_clean(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Request-scoped transactional scope over a storage backend.
///
/// Repositories are built lazily, one per entity type, the first time they
/// are asked for, and live as long as the unit of work. Their mutations stay
/// staged until [`UnitOfWork::save_changes`] writes every dirty table.
pub struct UnitOfWork<B: StorageBackend> {
    backend: B,
    tables: HashMap<TypeId, Box<dyn StagedTable>>,
}

impl<B: StorageBackend> UnitOfWork<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            tables: HashMap::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The repository for `E`, loading its table on first access.
    pub async fn repository<E: Entity>(&mut self) -> Result<&mut Repository<E>> {
        let key = TypeId::of::<E>();
        if !self.tables.contains_key(&key) {
            let table = self.backend.load_table(E::TABLE).await?;
            let repo = Repository::<E>::from_table(table)?;
            self.tables.insert(key, Box::new(repo));
        }

        self.tables
            .get_mut(&key)
            .and_then(|staged| staged.as_any_mut().downcast_mut::<Repository<E>>())
            .ok_or_else(|| TicketsError::Store(format!("repository for {} unavailable", E::TABLE)))
    }

    /// The repository for `E` if it has been loaded already.
    pub fn loaded<E: Entity>(&self) -> Option<&Repository<E>> {
        self.tables
            .get(&TypeId::of::<E>())
            .and_then(|staged| staged.as_any().downcast_ref::<Repository<E>>())
    }

    pub async fn tickets(&mut self) -> Result<&mut Repository<Ticket>> {
        self.repository::<Ticket>().await
    }

    pub async fn messages(&mut self) -> Result<&mut Repository<Message>> {
        self.repository::<Message>().await
    }

    pub async fn attachments(&mut self) -> Result<&mut Repository<Attachment>> {
        self.repository::<Attachment>().await
    }

    pub async fn users(&mut self) -> Result<&mut Repository<User>> {
        self.repository::<User>().await
    }

    pub fn has_changes(&self) -> bool {
        self.tables.values().any(|staged| staged.is_dirty())
    }

    /// Durably commit every staged change.
    ///
    /// Returns the number of tables written. On failure nothing is marked
    /// clean, so the changes stay staged and the commit can be retried.
    pub async fn save_changes(&mut self) -> Result<usize> {
        let mut snapshots = Vec::new();
        for staged in self.tables.values().filter(|staged| staged.is_dirty()) {
            snapshots.push((staged.table(), staged.snapshot()?));
        }

        if snapshots.is_empty() {
            debug!("No staged changes");
            return Ok(0);
        }

        // Stable write order, independent of map iteration
        snapshots.sort_by_key(|(table, _)| *table);

        if let Err(e) = self.backend.write_tables(&snapshots).await {
            warn!(error = %e, "Commit failed");
            return Err(TicketsError::Persistence(e.to_string()));
        }

        for staged in self.tables.values_mut() {
            staged.mark_clean();
        }
        info!(tables = snapshots.len(), "Committed changes");
        Ok(snapshots.len())
    }

    /// Drop every staged change. The next access reloads from the backend.
    pub fn discard(&mut self) {
        if self.has_changes() {
            debug!("Discarding staged changes");
        }
        self.tables.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    #[tokio::test]
    async fn repository_is_cached_per_type() {
        let mut uow = UnitOfWork::new(MemBackend::new());
        uow.tickets()
            .await
            .unwrap()
            .add(Ticket::new("a", "b", "c@d"))
            .unwrap();
        // Same working set on second access, before any commit
        assert_eq!(uow.tickets().await.unwrap().len(), 1);
        assert!(uow.loaded::<Ticket>().is_some());
        assert!(uow.loaded::<User>().is_none());
    }

    #[tokio::test]
    async fn nothing_is_durable_before_save_changes() {
        let mut uow = UnitOfWork::new(MemBackend::new());
        uow.tickets()
            .await
            .unwrap()
            .add(Ticket::new("a", "b", "c@d"))
            .unwrap();
        assert!(uow.has_changes());
        assert!(uow.backend().table("tickets").is_none());

        assert_eq!(uow.save_changes().await.unwrap(), 1);
        assert!(!uow.has_changes());
        let stored = uow.backend().table("tickets").unwrap();
        assert_eq!(stored.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn save_without_changes_writes_nothing() {
        let mut uow = UnitOfWork::new(MemBackend::new());
        uow.tickets().await.unwrap();
        assert_eq!(uow.save_changes().await.unwrap(), 0);
        assert_eq!(uow.backend().write_count(), 0);
    }

    #[tokio::test]
    async fn failed_commit_is_a_persistence_error_and_keeps_changes() {
        let mut uow = UnitOfWork::new(MemBackend::new());
        uow.users()
            .await
            .unwrap()
            .add(User::new("ann", "Ann Lee", "ann@example.com"))
            .unwrap();

        uow.backend().set_simulate_write_error(true);
        assert!(matches!(
            uow.save_changes().await,
            Err(TicketsError::Persistence(_))
        ));
        assert!(uow.has_changes());

        uow.backend().set_simulate_write_error(false);
        assert_eq!(uow.save_changes().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn discard_reloads_committed_state() {
        let mut uow = UnitOfWork::new(MemBackend::new());
        uow.tickets()
            .await
            .unwrap()
            .add(Ticket::new("kept", "b", "c@d"))
            .unwrap();
        uow.save_changes().await.unwrap();

        uow.tickets()
            .await
            .unwrap()
            .add(Ticket::new("dropped", "b", "c@d"))
            .unwrap();
        uow.discard();

        let titles: Vec<String> = uow
            .tickets()
            .await
            .unwrap()
            .get_all()
            .map(|t| t.title.clone())
            .collect();
        assert_eq!(titles, vec!["kept".to_string()]);
    }
}
