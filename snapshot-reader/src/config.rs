//! Reader configuration.
//!
//! One immutable value passed into the backends at construction. Whether the
//! relational mirror is usable is decided here, once, by a simple validity
//! rule: no database path means no relational backend, and every read on it
//! returns its empty form.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable names for the deployment-facing surface.
const ENV_INSTANCE_ID: &str = "SNAPSHOT_INSTANCE_ID";
const ENV_SNAPSHOT_DIR: &str = "SNAPSHOT_DIR";
const ENV_DATABASE_PATH: &str = "SNAPSHOT_DATABASE";

const DEFAULT_INSTANCE_ID: &str = "default";
const DEFAULT_SNAPSHOT_DIR: &str = "./data";

/// Immutable configuration for the snapshot reader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Identifier of the producing strategy instance; partitions rows in the
    /// relational mirror together with the variant.
    instance_id: String,
    /// Directory scanned by the file backend for `snapshot_<variant>.json`.
    snapshot_dir: PathBuf,
    /// Path of the relational mirror database. Empty disables the backend.
    database_path: PathBuf,
}

impl ReaderConfig {
    /// Creates a configuration from explicit values.
    ///
    /// # Arguments
    ///
    /// * `instance_id` - Strategy instance identifier.
    /// * `snapshot_dir` - Snapshot directory for the file backend.
    /// * `database_path` - Mirror database path; empty disables the mirror.
    pub fn new(
        instance_id: impl Into<String>,
        snapshot_dir: impl Into<PathBuf>,
        database_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            snapshot_dir: snapshot_dir.into(),
            database_path: database_path.into(),
        }
    }

    /// Builds a configuration from the environment, falling back to defaults
    /// for anything unset. An unset database variable leaves the relational
    /// backend disabled.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var(ENV_INSTANCE_ID).unwrap_or_else(|_| DEFAULT_INSTANCE_ID.to_string()),
            std::env::var(ENV_SNAPSHOT_DIR).unwrap_or_else(|_| DEFAULT_SNAPSHOT_DIR.to_string()),
            std::env::var(ENV_DATABASE_PATH).unwrap_or_default(),
        )
    }

    /// Whether the relational mirror is configured at all.
    pub fn relational_enabled(&self) -> bool {
        !self.database_path.as_os_str().is_empty()
    }

    pub fn get_instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn get_snapshot_dir(&self) -> &Path {
        &self.snapshot_dir
    }

    pub fn get_database_path(&self) -> &Path {
        &self.database_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_database_path_disables_relational() {
        let config = ReaderConfig::new("default", "./data", "");
        assert!(!config.relational_enabled());

        let config = ReaderConfig::new("default", "./data", "./data/mirror.db");
        assert!(config.relational_enabled());
    }
}
