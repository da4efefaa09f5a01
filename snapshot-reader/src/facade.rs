//! Caller-facing entry point.
//!
//! Picks the storage backend once, from the configuration's validity rule,
//! and exposes the read operations uniformly. Callers never know which
//! backend answered.

use log::info;
use snapshot_core::{Bar, StrategyEvent, StrategySummary, ViewModel};

use crate::config::ReaderConfig;
use crate::store::{
    EventQuery, FileSnapshotStore, RelationalSnapshotStore, SnapshotStore, TimeRange,
};

/// Uniform read access to strategy snapshots, events and bars.
pub struct ReaderFacade {
    store: Box<dyn SnapshotStore>,
}

impl ReaderFacade {
    /// Builds a facade over the backend the configuration selects: the
    /// relational mirror when one is configured, the snapshot directory
    /// otherwise.
    pub fn new(config: ReaderConfig) -> Self {
        let store: Box<dyn SnapshotStore> = if config.relational_enabled() {
            info!(
                "Reading snapshots from relational mirror {:?}",
                config.get_database_path()
            );
            Box::new(RelationalSnapshotStore::new(config))
        } else {
            info!(
                "Reading snapshots from directory {:?}",
                config.get_snapshot_dir()
            );
            Box::new(FileSnapshotStore::new(config.get_snapshot_dir()))
        };
        Self { store }
    }

    /// Lists every variant with a stored snapshot.
    pub fn list_strategies(&self) -> Vec<StrategySummary> {
        self.store.list_available_strategies()
    }

    /// The normalized view model of one variant, or `None` when absent.
    pub fn get_strategy_data(&self, variant: &str) -> Option<ViewModel> {
        self.store.get_strategy_data(variant)
    }

    /// Recent event-log rows, newest first; empty on the file backend.
    pub fn get_events(&self, variant: &str, query: &EventQuery) -> Vec<StrategyEvent> {
        self.store.get_events(variant, query)
    }

    /// Historical bars for a `code.venue` identifier; empty on the file
    /// backend.
    pub fn get_bars(
        &self,
        vt_symbol: &str,
        range: &TimeRange,
        interval_token: &str,
        limit: usize,
    ) -> Vec<Bar> {
        self.store.get_bars(vt_symbol, range, interval_token, limit)
    }
}
