//! Storage backends for strategy snapshots.
//!
//! Both backends implement [`SnapshotStore`]: locate the latest raw snapshot
//! for a variant and hand back the normalized view model. The relational
//! backend additionally serves the event log and historical bars; the file
//! backend answers those with the trait's empty defaults.
//!
//! No error crosses a public operation. Internal failures are logged and the
//! operation returns its type's empty form (`None`, `[]`).

pub mod file;
pub mod relational;

pub use file::FileSnapshotStore;
pub use relational::RelationalSnapshotStore;

use snapshot_core::marker::format_timestamp;
use snapshot_core::{Bar, StrategyEvent, StrategySummary, ViewModel};
use thiserror::Error;

/// Internal error type for backend plumbing. Never escapes a public
/// operation; the boundary converts it into the empty form and a log line.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// The relational mirror is not configured; reads degrade to empty.
    #[error("Relational backend is not configured")]
    Disabled,
}

pub(crate) type Result<T> = std::result::Result<T, StoreError>;

/// Inclusive time window over bar timestamps, given as ISO-8601 or
/// `YYYY-MM-DD HH:MM:SS` strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Normalizes both bounds to the pipeline's timestamp form, suitable for
    /// lexicographic comparison in SQL. Returns `None` when either bound does
    /// not parse or the window is inverted.
    pub fn normalized(&self) -> Option<(String, String)> {
        let start = format_timestamp(&self.start)?;
        let end = format_timestamp(&self.end)?;
        if start > end {
            return None;
        }
        Some((start, end))
    }
}

/// Optional filters and result cap for the event-log query. Filters are
/// conjunctive and only applied when set; the variant itself is always
/// required and passed separately.
#[derive(Debug, Clone)]
pub struct EventQuery {
    pub vt_symbol: Option<String>,
    pub time_range: Option<TimeRange>,
    pub event_type: Option<String>,
    pub limit: u32,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            vt_symbol: None,
            time_range: None,
            event_type: None,
            limit: 100,
        }
    }
}

/// The storage contract shared by both backends.
pub trait SnapshotStore {
    /// Lists every variant with a stored snapshot. Partial results on
    /// unreadable entries; never an error.
    fn list_available_strategies(&self) -> Vec<StrategySummary>;

    /// Loads and normalizes the latest snapshot of one variant. `None` for
    /// absent, corrupt or non-mapping payloads.
    fn get_strategy_data(&self, variant: &str) -> Option<ViewModel>;

    /// Recent event-log rows for a variant, newest first. Empty on backends
    /// without an event log.
    fn get_events(&self, _variant: &str, _query: &EventQuery) -> Vec<StrategyEvent> {
        Vec::new()
    }

    /// Historical bars for a combined `code.venue` identifier. Empty on
    /// backends without bar storage, or for invalid venue/interval/range.
    fn get_bars(
        &self,
        _vt_symbol: &str,
        _range: &TimeRange,
        _interval_token: &str,
        _limit: usize,
    ) -> Vec<Bar> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_range_normalization() {
        let range = TimeRange::new("2025-01-15T00:00:00", "2025-01-16 00:00:00");
        assert_eq!(
            range.normalized(),
            Some(("2025-01-15 00:00:00".to_string(), "2025-01-16 00:00:00".to_string()))
        );
    }

    #[test]
    fn test_inverted_or_malformed_range_is_rejected() {
        let inverted = TimeRange::new("2025-01-16T00:00:00", "2025-01-15T00:00:00");
        assert_eq!(inverted.normalized(), None);

        let malformed = TimeRange::new("yesterday", "today");
        assert_eq!(malformed.normalized(), None);
    }
}
