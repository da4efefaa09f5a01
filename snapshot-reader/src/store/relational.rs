//! Relational snapshot mirror.
//!
//! A writer process mirrors the latest snapshot per `(variant, instance)` and
//! an append-only event log into a small database; this backend reads both,
//! plus historical bars from the market-data recorder's `bar_data` table.
//!
//! The mirror is optional infrastructure. An unconfigured database or any
//! connection failure degrades every read to its empty form; nothing here may
//! break the caller. One connection is opened per call and dropped on every
//! exit path — no pooling, no reuse.

use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use snapshot_core::{
    split_vt_symbol, view_model_from_payload, Bar, Exchange, Interval, StrategyEvent,
    StrategySummary, ViewModel,
};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::ReaderConfig;

use super::{EventQuery, Result, SnapshotStore, StoreError, TimeRange};

/// Hard ceiling on event-query results; caller limits are clamped into
/// `1..=MAX_EVENT_LIMIT`.
pub const MAX_EVENT_LIMIT: u32 = 500;

/// Reads snapshots, events and bars from the relational mirror.
pub struct RelationalSnapshotStore {
    config: ReaderConfig,
    /// One-shot schema latch. Only set after a successful bootstrap, so a
    /// failed attempt is retried on the next call. The DDL itself is
    /// idempotent, which makes races on the flag harmless.
    schema_ready: AtomicBool,
}

impl RelationalSnapshotStore {
    pub fn new(config: ReaderConfig) -> Self {
        Self {
            config,
            schema_ready: AtomicBool::new(false),
        }
    }

    /// Creates the mirror tables if absent. Best-effort and memoized: runs
    /// real DDL at most once per instance, and repeated calls after a failure
    /// retry the bootstrap.
    pub fn ensure_tables(&self) {
        if self.schema_ready.load(Ordering::Relaxed) {
            return;
        }
        match self.bootstrap_schema() {
            Ok(()) => self.schema_ready.store(true, Ordering::Relaxed),
            Err(StoreError::Disabled) => {
                debug!("Relational backend disabled; skipping schema bootstrap");
            }
            Err(err) => warn!("Schema bootstrap failed, will retry: {}", err),
        }
    }

    fn open(&self) -> Result<Connection> {
        if !self.config.relational_enabled() {
            return Err(StoreError::Disabled);
        }
        Ok(Connection::open(self.config.get_database_path())?)
    }

    fn bootstrap_schema(&self) -> Result<()> {
        let conn = self.open()?;
        // `bar_data` belongs to the market-data recorder and is deliberately
        // not created here; this backend only reads it.
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS strategy_snapshot (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                variant TEXT NOT NULL,
                instance_id TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                bar_dt TEXT,
                bar_interval TEXT,
                bar_window INTEGER,
                payload_json TEXT NOT NULL,
                UNIQUE (variant, instance_id)
            );
            CREATE TABLE IF NOT EXISTS strategy_event (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                variant TEXT NOT NULL,
                instance_id TEXT NOT NULL,
                vt_symbol TEXT NOT NULL DEFAULT '',
                bar_dt TEXT,
                event_type TEXT NOT NULL,
                event_key TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL,
                payload_json TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_strategy_event_variant
                ON strategy_event(variant, id);
            "#,
        )?;
        Ok(())
    }

    fn fetch_payload(&self, variant: &str) -> Result<Option<String>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT payload_json FROM strategy_snapshot \
             WHERE variant = ?1 ORDER BY updated_at DESC, id DESC LIMIT 1",
        )?;
        let payload = stmt
            .query_row(params![variant], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(payload)
    }

    fn fetch_listing(&self) -> Result<Vec<StrategySummary>> {
        let conn = self.open()?;
        // Bare columns beside MAX() resolve to the newest row per group.
        let mut stmt = conn.prepare(
            "SELECT variant, MAX(updated_at), LENGTH(payload_json) \
             FROM strategy_snapshot GROUP BY variant ORDER BY variant",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StrategySummary {
                variant: row.get(0)?,
                last_update: row.get(1)?,
                file_size: row.get::<_, i64>(2)?.max(0) as u64,
            })
        })?;
        let mut listing = Vec::new();
        for row in rows {
            listing.push(row?);
        }
        Ok(listing)
    }

    fn fetch_events(&self, variant: &str, query: &EventQuery) -> Result<Vec<StrategyEvent>> {
        let conn = self.open()?;
        let mut sql = String::from(
            "SELECT id, variant, instance_id, vt_symbol, bar_dt, event_type, \
             event_key, created_at, payload_json \
             FROM strategy_event WHERE variant = ?",
        );
        let mut args: Vec<String> = vec![variant.to_string()];

        if let Some(symbol) = &query.vt_symbol {
            sql.push_str(" AND vt_symbol = ?");
            args.push(symbol.clone());
        }
        if let Some(range) = &query.time_range {
            match range.normalized() {
                Some((start, end)) => {
                    sql.push_str(" AND bar_dt >= ? AND bar_dt <= ?");
                    args.push(start);
                    args.push(end);
                }
                None => debug!("Ignoring malformed event time range {:?}", range),
            }
        }
        if let Some(event_type) = &query.event_type {
            sql.push_str(" AND event_type = ?");
            args.push(event_type.clone());
        }
        let limit = query.limit.clamp(1, MAX_EVENT_LIMIT);
        sql.push_str(&format!(" ORDER BY id DESC LIMIT {limit}"));

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), |row| {
            let payload_json: String = row.get(8)?;
            Ok(StrategyEvent {
                id: row.get(0)?,
                variant: row.get(1)?,
                instance_id: row.get(2)?,
                vt_symbol: row.get(3)?,
                bar_dt: row.get(4)?,
                event_type: row.get(5)?,
                event_key: row.get(6)?,
                created_at: row.get(7)?,
                payload: serde_json::from_str(&payload_json).unwrap_or(Value::Null),
            })
        })?;
        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }
        Ok(events)
    }

    fn fetch_bars(
        &self,
        code: &str,
        exchange: Exchange,
        interval: Interval,
        start: &str,
        end: &str,
    ) -> Result<Vec<Bar>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT datetime, open_price, high_price, low_price, close_price, volume \
             FROM bar_data \
             WHERE symbol = ?1 AND exchange = ?2 AND interval = ?3 \
               AND datetime >= ?4 AND datetime <= ?5 \
             ORDER BY datetime ASC",
        )?;
        let rows = stmt.query_map(
            params![code, exchange.as_str(), interval.as_str(), start, end],
            |row| {
                Ok(Bar {
                    datetime: row.get(0)?,
                    open: row.get(1)?,
                    high: row.get(2)?,
                    low: row.get(3)?,
                    close: row.get(4)?,
                    volume: row.get(5)?,
                })
            },
        )?;
        let mut bars = Vec::new();
        for row in rows {
            bars.push(row?);
        }
        Ok(bars)
    }

    fn log_degraded(operation: &str, err: &StoreError) {
        match err {
            StoreError::Disabled => {
                debug!("Relational backend disabled; {} returns empty", operation);
            }
            other => warn!("Relational {} failed: {}", operation, other),
        }
    }
}

impl SnapshotStore for RelationalSnapshotStore {
    fn list_available_strategies(&self) -> Vec<StrategySummary> {
        self.ensure_tables();
        match self.fetch_listing() {
            Ok(listing) => listing,
            Err(err) => {
                Self::log_degraded("list_available_strategies", &err);
                Vec::new()
            }
        }
    }

    fn get_strategy_data(&self, variant: &str) -> Option<ViewModel> {
        self.ensure_tables();
        let payload = match self.fetch_payload(variant) {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(err) => {
                Self::log_degraded("get_strategy_data", &err);
                return None;
            }
        };
        let value: Value = match serde_json::from_str(&payload) {
            Ok(value) => value,
            Err(err) => {
                warn!("Snapshot payload for {:?} is not valid JSON: {}", variant, err);
                return None;
            }
        };
        // A payload that parses to anything but a mapping also yields None.
        view_model_from_payload(&value, variant)
    }

    fn get_events(&self, variant: &str, query: &EventQuery) -> Vec<StrategyEvent> {
        self.ensure_tables();
        match self.fetch_events(variant, query) {
            Ok(events) => events,
            Err(err) => {
                Self::log_degraded("get_events", &err);
                Vec::new()
            }
        }
    }

    fn get_bars(
        &self,
        vt_symbol: &str,
        range: &TimeRange,
        interval_token: &str,
        limit: usize,
    ) -> Vec<Bar> {
        self.ensure_tables();
        let Some((code, exchange)) = split_vt_symbol(vt_symbol) else {
            debug!("Unrecognized vt_symbol {:?}", vt_symbol);
            return Vec::new();
        };
        let Some(interval) = Interval::from_token(interval_token) else {
            debug!("Unrecognized interval token {:?}", interval_token);
            return Vec::new();
        };
        let Some((start, end)) = range.normalized() else {
            debug!("Invalid bar time range {:?}", range);
            return Vec::new();
        };
        match self.fetch_bars(code, exchange, interval, &start, &end) {
            Ok(mut bars) => {
                if bars.len() > limit {
                    // Keep the most recent bars: trim from the front.
                    bars.drain(..bars.len() - limit);
                }
                bars
            }
            Err(err) => {
                Self::log_degraded("get_bars", &err);
                Vec::new()
            }
        }
    }
}
