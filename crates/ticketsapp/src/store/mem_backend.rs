use super::backend::StorageBackend;
use crate::error::{Result, TicketsError};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since a unit of work is confined
/// to one request on one thread.
#[derive(Default)]
pub struct MemBackend {
    tables: RefCell<HashMap<String, Value>>,
    writes: RefCell<usize>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Current contents of a table, as last written.
    pub fn table(&self, name: &str) -> Option<Value> {
        self.tables.borrow().get(name).cloned()
    }

    /// Number of successful `write_tables` calls.
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

impl StorageBackend for MemBackend {
    async fn load_table(&self, table: &str) -> Result<Option<Value>> {
        Ok(self.tables.borrow().get(table).cloned())
    }

    async fn write_tables(&self, tables: &[(&'static str, Value)]) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(TicketsError::Store("Simulated write error".to_string()));
        }
        let mut stored = self.tables.borrow_mut();
        for (name, value) in tables {
            stored.insert(name.to_string(), value.clone());
        }
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn missing_table_loads_as_none() {
        let backend = MemBackend::new();
        assert!(backend.load_table("tickets").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn written_tables_load_back() {
        let backend = MemBackend::new();
        backend
            .write_tables(&[("tickets", json!([{"id": 1}])), ("users", json!([]))])
            .await
            .unwrap();
        assert_eq!(
            backend.load_table("tickets").await.unwrap(),
            Some(json!([{"id": 1}]))
        );
        assert_eq!(backend.table("users"), Some(json!([])));
        assert_eq!(backend.write_count(), 1);
    }

    #[tokio::test]
    async fn simulated_write_error_leaves_tables_untouched() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        let result = backend.write_tables(&[("tickets", json!([]))]).await;
        assert!(matches!(result, Err(TicketsError::Store(_))));
        assert!(backend.table("tickets").is_none());
        assert_eq!(backend.write_count(), 0);
    }
}
