//! Builder for creating and configuring SQLite stores.

use std::path::{Path, PathBuf};

use tokio::task;

use super::SqliteStore;
use crate::{
    db::Database,
    error::{join_error, Result, TesseraError},
};

/// Builder for creating and configuring [`SqliteStore`] instances.
#[derive(Debug, Clone)]
pub struct StoreBuilder {
    database_path: Option<PathBuf>,
}

impl StoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/tessera/tessera.db` or `~/.local/share/tessera/tessera.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Builds the configured store, creating the database file and schema
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns `TesseraError::FileSystem` if the database directory cannot be
    /// created. Returns `TesseraError::Database` if schema initialization
    /// fails.
    pub async fn build(self) -> Result<SqliteStore> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| TesseraError::FileSystem {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), TesseraError>(())
        })
        .await
        .map_err(join_error)??;

        Ok(SqliteStore::new(db_path))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("tessera")
            .place_data_file("tessera.db")
            .map_err(|e| TesseraError::XdgDirectory(e.to_string()))
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
