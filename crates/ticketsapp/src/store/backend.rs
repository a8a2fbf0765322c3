use crate::error::Result;
use serde_json::Value;

/// Abstract interface for raw table I/O.
///
/// This trait handles the "how" of storage (filesystem vs memory), while the
/// unit of work handles the "what" (which tables are dirty, when to write).
/// A table is a JSON array of records in storage order.
///
/// This is the only place the crate suspends. Dropping a returned future
/// cancels the I/O it was doing.
#[allow(async_fn_in_trait)]
pub trait StorageBackend {
    /// Load a table. Returns `Ok(None)` if the table was never written.
    async fn load_table(&self, table: &str) -> Result<Option<Value>>;

    /// Write several tables in one go.
    /// Each table write MUST be atomic (e.g. write to tmp then rename).
    async fn write_tables(&self, tables: &[(&'static str, Value)]) -> Result<()>;
}
