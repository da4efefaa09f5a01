use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Chart-ready view of one instrument.
///
/// `dates`, `ohlc` and `volumes` are parallel sequences in bar order. Each
/// `ohlc` row is `[open, close, low, high]` — NOT the natural OHLC order; the
/// chart frontend consumes exactly this layout and it must not be "fixed".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentView {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub ohlc: Vec<[f64; 4]>,
    #[serde(default)]
    pub volumes: Vec<f64>,
    #[serde(default)]
    pub indicators: Value,
    /// Reserved for future use; always empty in this pipeline.
    #[serde(default)]
    pub status: Map<String, Value>,
    #[serde(default)]
    pub last_price: f64,
    #[serde(default)]
    pub delivery_month: String,
}

/// The display-ready strategy state handed to callers. Exactly these five
/// fields, nothing else; a `ViewModel` lives for one request only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub variant: String,
    /// Keyed by instrument symbol; insertion order of the snapshot is kept.
    #[serde(default)]
    pub instruments: Map<String, Value>,
    #[serde(default)]
    pub positions: Vec<super::Position>,
    #[serde(default)]
    pub orders: Vec<super::PendingOrder>,
}

/// One row of the strategy listing: which variants have a snapshot and how
/// fresh it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub variant: String,
    pub last_update: String,
    pub file_size: u64,
}
