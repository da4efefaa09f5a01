//! File-backed snapshot store.
//!
//! The strategy engine drops one `snapshot_<variant>.json` per variant into a
//! shared directory; this backend scans that directory for the listing and
//! reads a single file per data request. Unreadable entries are skipped and
//! logged — the listing returns whatever is usable.

use chrono::{DateTime, Local};
use log::{debug, warn};
use serde_json::Value;
use snapshot_core::marker::TIMESTAMP_FORMAT;
use snapshot_core::{view_model_from_payload, StrategySummary, ViewModel};
use std::fs;
use std::path::PathBuf;

use super::{Result, SnapshotStore, StoreError};

const SNAPSHOT_PREFIX: &str = "snapshot_";
const SNAPSHOT_SUFFIX: &str = ".json";

/// Reads snapshots from a local directory.
pub struct FileSnapshotStore {
    snapshot_dir: PathBuf,
}

impl FileSnapshotStore {
    /// Creates a store over the given snapshot directory. The directory may
    /// not exist yet; reads then simply find nothing.
    pub fn new(snapshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_dir: snapshot_dir.into(),
        }
    }

    fn snapshot_path(&self, variant: &str) -> PathBuf {
        self.snapshot_dir
            .join(format!("{SNAPSHOT_PREFIX}{variant}{SNAPSHOT_SUFFIX}"))
    }

    fn load_payload(&self, variant: &str) -> Result<Value> {
        let path = self.snapshot_path(variant);
        let file = fs::File::open(&path)?;
        let payload = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(payload)
    }

    /// Turns one directory entry into a listing row; `None` for entries that
    /// do not follow the naming convention or cannot be inspected.
    fn summarize(entry: &fs::DirEntry) -> Option<StrategySummary> {
        let name = entry.file_name().into_string().ok()?;
        let variant = name
            .strip_prefix(SNAPSHOT_PREFIX)?
            .strip_suffix(SNAPSHOT_SUFFIX)?;
        if variant.is_empty() {
            return None;
        }
        let metadata = entry.metadata().ok()?;
        let modified = metadata.modified().ok()?;
        let last_update = DateTime::<Local>::from(modified)
            .format(TIMESTAMP_FORMAT)
            .to_string();
        Some(StrategySummary {
            variant: variant.to_string(),
            last_update,
            file_size: metadata.len(),
        })
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn list_available_strategies(&self) -> Vec<StrategySummary> {
        let entries = match fs::read_dir(&self.snapshot_dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(
                    "Snapshot directory {:?} not readable: {}",
                    self.snapshot_dir, err
                );
                return Vec::new();
            }
        };
        let mut summaries: Vec<StrategySummary> = entries
            .flatten()
            .filter_map(|entry| Self::summarize(&entry))
            .collect();
        summaries.sort_by(|a, b| a.variant.cmp(&b.variant));
        summaries
    }

    fn get_strategy_data(&self, variant: &str) -> Option<ViewModel> {
        match self.load_payload(variant) {
            Ok(payload) => view_model_from_payload(&payload, variant),
            Err(StoreError::Io(err)) => {
                debug!("No snapshot file for variant {:?}: {}", variant, err);
                None
            }
            Err(err) => {
                warn!("Corrupt snapshot for variant {:?}: {}", variant, err);
                None
            }
        }
    }
}
