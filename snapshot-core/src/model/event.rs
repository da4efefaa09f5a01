use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of the append-only strategy event log.
///
/// `event_key` is the caller-supplied idempotency key; the writer deduplicates
/// on it, so a key appears at most once. `payload` is the decoded JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyEvent {
    pub id: i64,
    pub variant: String,
    pub instance_id: String,
    pub vt_symbol: String,
    pub bar_dt: Option<String>,
    pub event_type: String,
    pub event_key: String,
    pub created_at: String,
    pub payload: Value,
}
