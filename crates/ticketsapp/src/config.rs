//! # Configuration
//!
//! Tickets configuration is loaded with [`confique`] from an optional TOML
//! file and environment variables.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `TICKETS_DATA_DIR`, `TICKETS_LOG`
//! 2. **Config file**: the path handed to [`TicketsConfig::load`], if it exists
//! 3. **Compiled defaults**
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data directory (via `directories`) | Where table files live |
//! | `log` | `warn` | Default log filter when `RUST_LOG` is unset |

use std::path::{Path, PathBuf};

use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for the ticket store, stored in `tickets.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TicketsConfig {
    /// Directory holding the table files
    #[config(env = "TICKETS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Default log filter, e.g. "info" or "ticketsapp=debug"
    #[config(env = "TICKETS_LOG", default = "warn")]
    pub log: String,
}

impl Default for TicketsConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            log: "warn".to_string(),
        }
    }
}

impl TicketsConfig {
    /// Load from the environment, then `file` when given.
    ///
    /// A missing file is not an error.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(file) = file {
            builder = builder.file(file);
        }
        Ok(builder.load()?)
    }

    /// The configured data directory, or the platform default.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "tickets")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".tickets"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TicketsConfig::default();
        assert_eq!(config.log, "warn");
        assert!(config.data_dir.is_none());
        assert!(!config.data_dir().as_os_str().is_empty());
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let config = TicketsConfig {
            data_dir: Some(PathBuf::from("/srv/tickets")),
            ..Default::default()
        };
        assert_eq!(config.data_dir(), PathBuf::from("/srv/tickets"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickets.toml");
        std::fs::write(&path, "data_dir = \"/var/lib/tickets\"\nlog = \"debug\"\n").unwrap();

        let config = TicketsConfig::load(Some(&path)).unwrap();
        if std::env::var_os("TICKETS_DATA_DIR").is_none() {
            assert_eq!(config.data_dir(), PathBuf::from("/var/lib/tickets"));
        }
        if std::env::var_os("TICKETS_LOG").is_none() {
            assert_eq!(config.log, "debug");
        }
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TicketsConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        if std::env::var_os("TICKETS_LOG").is_none() {
            assert_eq!(config.log, "warn");
        }
    }
}
