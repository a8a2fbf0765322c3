use super::backend::StorageBackend;
use crate::error::Result;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;
use uuid::Uuid;

/// Filesystem backend: one `<table>.json` file per table under `root`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.root.join(format!("{}.json", table))
    }
}

impl StorageBackend for FsBackend {
    async fn load_table(&self, table: &str) -> Result<Option<Value>> {
        let path = self.table_path(table);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn write_tables(&self, tables: &[(&'static str, Value)]) -> Result<()> {
        fs::create_dir_all(&self.root).await?;

        for (name, value) in tables {
            let content = serde_json::to_string_pretty(value)?;

            // Atomic write: tmp file then rename
            let tmp_file = self.root.join(format!(".{}-{}.tmp", name, Uuid::new_v4()));
            let written = match fs::write(&tmp_file, content).await {
                Ok(()) => fs::rename(&tmp_file, self.table_path(name)).await,
                Err(e) => Err(e),
            };
            if let Err(e) = written {
                if let Err(cleanup) = fs::remove_file(&tmp_file).await {
                    if cleanup.kind() != ErrorKind::NotFound {
                        warn!(path = %tmp_file.display(), error = %cleanup, "Could not remove tmp file");
                    }
                }
                return Err(e.into());
            }
        }

        Ok(())
    }
}
