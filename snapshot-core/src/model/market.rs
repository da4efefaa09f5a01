//! Venue and interval vocabulary used by the historical-bar lookups.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The venues the producer trades on. Combined identifiers (`vt_symbol`)
/// carry the venue after the last `.`; anything outside this set is rejected
/// at the query boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exchange {
    Cffex,
    Shfe,
    Czce,
    Dce,
    Ine,
    Gfex,
    Sse,
    Szse,
    Local,
}

/// The venue token was not a recognized exchange.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown exchange: {0}")]
pub struct UnknownExchange(pub String);

impl Exchange {
    /// The canonical uppercase token used in identifiers and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::Cffex => "CFFEX",
            Exchange::Shfe => "SHFE",
            Exchange::Czce => "CZCE",
            Exchange::Dce => "DCE",
            Exchange::Ine => "INE",
            Exchange::Gfex => "GFEX",
            Exchange::Sse => "SSE",
            Exchange::Szse => "SZSE",
            Exchange::Local => "LOCAL",
        }
    }
}

impl FromStr for Exchange {
    type Err = UnknownExchange;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "CFFEX" => Ok(Exchange::Cffex),
            "SHFE" => Ok(Exchange::Shfe),
            "CZCE" => Ok(Exchange::Czce),
            "DCE" => Ok(Exchange::Dce),
            "INE" => Ok(Exchange::Ine),
            "GFEX" => Ok(Exchange::Gfex),
            "SSE" => Ok(Exchange::Sse),
            "SZSE" => Ok(Exchange::Szse),
            "LOCAL" => Ok(Exchange::Local),
            other => Err(UnknownExchange(other.to_string())),
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splits a combined `code.venue` identifier into its base code and venue.
///
/// The split is on the last `.` so codes containing dots stay intact.
/// Returns `None` when there is no venue part or the venue is unknown.
pub fn split_vt_symbol(vt_symbol: &str) -> Option<(&str, Exchange)> {
    let (code, venue) = vt_symbol.rsplit_once('.')?;
    let exchange = venue.parse().ok()?;
    Some((code, exchange))
}

/// Bar aggregation interval understood by the market-data store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    Minute,
    Hour,
    Daily,
    Weekly,
}

impl Interval {
    /// Resolves a friendly token (`"1m"`, `"hour"`, `"d"`, ...) to an
    /// interval. Case-insensitive; unknown tokens yield `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "1m" | "m" | "min" | "minute" => Some(Interval::Minute),
            "1h" | "h" | "hour" => Some(Interval::Hour),
            "1d" | "d" | "day" | "daily" => Some(Interval::Daily),
            "1w" | "w" | "week" | "weekly" => Some(Interval::Weekly),
            _ => None,
        }
    }

    /// The concrete code stored by the market-data recorder.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute => "1m",
            Interval::Hour => "1h",
            Interval::Daily => "d",
            Interval::Weekly => "w",
        }
    }
}
