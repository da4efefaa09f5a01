//! # Snapshot Core Library
//!
//! Decode and normalization pipeline for trading-strategy runtime snapshots.
//!
//! A strategy engine periodically serializes its full runtime state into a
//! recursively tagged JSON document. This crate turns that document back into
//! a stable, display-ready view model. It performs no I/O; storage backends
//! live in the `snapshot-reader` crate.
//!
//! ## Modules
//! - `marker`: Recursive tagged-value decoder (dataframe/datetime/set/... markers).
//! - `symbol`: Delivery-month extraction from contract identifiers.
//! - `model`: View-model value types shared by all backends.
//! - `transform`: Snapshot -> `ViewModel` normalization.

pub mod marker;
pub mod model;
pub mod symbol;
pub mod transform;

pub use model::{
    split_vt_symbol, Bar, Exchange, Interval, InstrumentView, PendingOrder, Position,
    StrategyEvent, StrategySummary, ViewModel,
};
pub use transform::{transform, view_model_from_payload};
