//! # Snapshot Reader Library
//!
//! Storage backends for strategy snapshots and the facade that exposes them
//! under one contract. Snapshots are read either from a local snapshot
//! directory or from a relational mirror; the mirror is optional
//! infrastructure and its absence never breaks a caller — every operation
//! degrades to its empty form instead.
//!
//! ## Modules
//! - `config`: Immutable reader configuration and the backend validity rule.
//! - `store`: The `SnapshotStore` contract plus the file and relational backends.
//! - `facade`: Backend selection and the uniform caller-facing operations.

pub mod config;
pub mod facade;
pub mod store;

pub use config::ReaderConfig;
pub use facade::ReaderFacade;
pub use store::{
    EventQuery, FileSnapshotStore, RelationalSnapshotStore, SnapshotStore, TimeRange,
};
