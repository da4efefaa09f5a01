use serde::{Deserialize, Serialize};

/// One open position of the strategy.
///
/// `direction` is the decoded enum text (e.g. `"Direction.LONG"`), kept as a
/// string for frontend compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub vt_symbol: String,
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub pnl: f64,
}

/// One order the strategy has submitted but that has not fully traded yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOrder {
    #[serde(default)]
    pub vt_orderid: String,
    #[serde(default)]
    pub vt_symbol: String,
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub offset: String,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub status: String,
}
