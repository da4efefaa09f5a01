use serde::{Deserialize, Serialize};

/// One OHLCV sample for a fixed time interval.
///
/// `datetime` is carried in the pipeline's output form
/// (`YYYY-MM-DD HH:MM:SS`). Bars are time-ordered by construction and no two
/// bars of one instrument share a timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub datetime: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(
        datetime: impl Into<String>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            datetime: datetime.into(),
            open,
            high,
            low,
            close,
            volume,
        }
    }
}
