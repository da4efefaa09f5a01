//! Builds the display-ready [`ViewModel`] from a decoded strategy snapshot.
//!
//! The transformer is a pure function of its inputs and never fails: missing
//! keys become empty collections or default scalars, tagged fields go through
//! the marker decoder, malformed pieces degrade to their empty forms.

use serde_json::{Map, Value};

use crate::marker;
use crate::model::{InstrumentView, PendingOrder, Position, ViewModel};
use crate::symbol;

/// Normalizes a raw snapshot into a [`ViewModel`] for the given variant.
///
/// # Arguments
///
/// * `snapshot` - The raw snapshot document (`current_dt`, `target_aggregate`,
///   `position_aggregate`), with tagged values still in place.
/// * `variant` - The strategy variant label the snapshot belongs to.
pub fn transform(snapshot: &Value, variant: &str) -> ViewModel {
    ViewModel {
        timestamp: extract_timestamp(snapshot.get("current_dt")),
        variant: variant.to_string(),
        instruments: build_instruments(snapshot),
        positions: build_positions(snapshot),
        orders: build_orders(snapshot),
    }
}

/// Dispatches a stored payload on its shape.
///
/// A payload that already looks like a view model (top-level `timestamp` and
/// `instruments` keys) passes through unchanged; any other object is treated
/// as a raw snapshot and transformed. Non-object payloads yield `None`.
pub fn view_model_from_payload(payload: &Value, variant: &str) -> Option<ViewModel> {
    let map = payload.as_object()?;
    if map.contains_key("timestamp") && map.contains_key("instruments") {
        let mut view: ViewModel = serde_json::from_value(payload.clone()).ok()?;
        if view.variant.is_empty() {
            view.variant = variant.to_string();
        }
        return Some(view);
    }
    Some(transform(payload, variant))
}

fn extract_timestamp(current_dt: Option<&Value>) -> String {
    match current_dt {
        Some(tagged @ Value::Object(_)) => match marker::resolve(tagged) {
            Value::String(text) => text,
            _ => String::new(),
        },
        Some(Value::String(raw)) if !raw.is_empty() => {
            marker::format_timestamp(raw).unwrap_or_else(|| raw.clone())
        }
        _ => String::new(),
    }
}

fn build_instruments(snapshot: &Value) -> Map<String, Value> {
    let mut instruments = Map::new();
    let Some(entries) = snapshot
        .get("target_aggregate")
        .and_then(|aggregate| aggregate.get("instruments"))
        .and_then(Value::as_object)
    else {
        return instruments;
    };

    for (key, entry) in entries {
        let records = BarHistory::probe(entry.get("bars")).resolve();
        if records.is_empty() {
            // Instruments with no bar history yet are dropped from the view:
            // the chart has nothing to draw and the frontend expects absence.
            continue;
        }

        let mut dates = Vec::with_capacity(records.len());
        let mut ohlc = Vec::with_capacity(records.len());
        let mut volumes = Vec::with_capacity(records.len());
        for record in &records {
            dates.push(text_field(record, "datetime"));
            // Chart layout: [open, close, low, high], not natural OHLC.
            ohlc.push([
                number_field(record, "open"),
                number_field(record, "close"),
                number_field(record, "low"),
                number_field(record, "high"),
            ]);
            volumes.push(number_field(record, "volume"));
        }
        let last_price = records
            .last()
            .map(|record| number_field(record, "close"))
            .unwrap_or(0.0);

        let indicators = entry
            .get("indicators")
            .map(marker::resolve)
            .unwrap_or_else(|| Value::Object(Map::new()));

        let view = InstrumentView {
            dates,
            ohlc,
            volumes,
            indicators,
            status: Map::new(),
            last_price,
            delivery_month: symbol::extract(key),
        };
        instruments.insert(
            key.clone(),
            serde_json::to_value(view).unwrap_or(Value::Null),
        );
    }
    instruments
}

/// How an instrument's bar history is materialized inside a snapshot.
///
/// Newer producers store a dataframe-tagged table; legacy ones a plain list
/// of record objects. The variant is selected by probing the value's shape at
/// load time, and both resolve to the same record list.
enum BarHistory<'a> {
    Tabular(&'a Value),
    Records(&'a [Value]),
    Absent,
}

impl<'a> BarHistory<'a> {
    fn probe(bars: Option<&'a Value>) -> Self {
        match bars {
            Some(tagged @ Value::Object(map)) if map.contains_key("dataframe") => {
                BarHistory::Tabular(tagged)
            }
            Some(Value::Array(items)) => BarHistory::Records(items),
            _ => BarHistory::Absent,
        }
    }

    fn resolve(&self) -> Vec<Value> {
        match self {
            BarHistory::Tabular(tagged) => match marker::resolve(tagged) {
                Value::Array(records) => records,
                _ => Vec::new(),
            },
            BarHistory::Records(items) => items.iter().map(marker::resolve).collect(),
            BarHistory::Absent => Vec::new(),
        }
    }
}

fn build_positions(snapshot: &Value) -> Vec<Position> {
    aggregate_entries(snapshot, "positions")
        .into_iter()
        .map(|(key, entry)| Position {
            vt_symbol: keyed_text(entry, "vt_symbol", key),
            direction: text_field(entry, "direction"),
            volume: number_field(entry, "volume"),
            price: number_field(entry, "price"),
            pnl: number_field(entry, "pnl"),
        })
        .collect()
}

fn build_orders(snapshot: &Value) -> Vec<PendingOrder> {
    aggregate_entries(snapshot, "pending_orders")
        .into_iter()
        .map(|(key, entry)| PendingOrder {
            vt_orderid: keyed_text(entry, "vt_orderid", key),
            vt_symbol: text_field(entry, "vt_symbol"),
            direction: text_field(entry, "direction"),
            offset: text_field(entry, "offset"),
            volume: number_field(entry, "volume"),
            price: number_field(entry, "price"),
            status: text_field(entry, "status"),
        })
        .collect()
}

/// Entries of a `position_aggregate` sub-mapping in insertion order. A list
/// payload (older producers) is tolerated and iterated as-is.
fn aggregate_entries<'a>(snapshot: &'a Value, field: &str) -> Vec<(Option<&'a str>, &'a Value)> {
    match snapshot
        .get("position_aggregate")
        .and_then(|aggregate| aggregate.get(field))
    {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, entry)| (Some(key.as_str()), entry))
            .collect(),
        Some(Value::Array(items)) => items.iter().map(|entry| (None, entry)).collect(),
        _ => Vec::new(),
    }
}

/// A string field, tagged or plain; empty string when absent.
fn text_field(entry: &Value, field: &str) -> String {
    match entry.get(field) {
        Some(value) => match marker::resolve(value) {
            Value::String(text) => text,
            Value::Null => String::new(),
            other => other.to_string(),
        },
        None => String::new(),
    }
}

/// Like [`text_field`] but falls back to the entry's map key when the field
/// is absent.
fn keyed_text(entry: &Value, field: &str, key: Option<&str>) -> String {
    match entry.get(field) {
        Some(_) => text_field(entry, field),
        None => key.unwrap_or("").to_string(),
    }
}

fn number_field(entry: &Value, field: &str) -> f64 {
    entry.get(field).and_then(Value::as_f64).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_snapshot() -> Value {
        json!({
            "current_dt": {"datetime": "2025-01-15T14:30:00+08:00"},
            "target_aggregate": {
                "instruments": {
                    "rb2501.SHFE": {
                        "bars": {"dataframe": true, "records": [
                            {"datetime": {"datetime": "2025-01-15T14:15:00"},
                             "open": 3500.0, "high": 3510.0, "low": 3495.0,
                             "close": 3505.0, "volume": 1200.0},
                            {"datetime": {"datetime": "2025-01-15T14:30:00"},
                             "open": 3505.0, "high": 3512.0, "low": 3500.0,
                             "close": 3508.0, "volume": 900.0},
                        ]},
                        "indicators": {"ma": {"dataclass": "Ma", "fast": 3506.1}},
                    },
                    "empty.SHFE": {
                        "bars": {"dataframe": true, "records": []},
                    },
                },
            },
            "position_aggregate": {
                "positions": {
                    "rb2501.SHFE": {
                        "vt_symbol": "rb2501.SHFE",
                        "direction": {"enum": "Direction.LONG"},
                        "volume": 2.0, "price": 3490.0, "pnl": 36.0,
                    },
                },
                "pending_orders": {
                    "gw.42": {
                        "vt_orderid": "gw.42", "vt_symbol": "rb2501.SHFE",
                        "direction": {"enum": "Direction.SHORT"},
                        "offset": {"enum": "Offset.CLOSE"},
                        "volume": 1.0, "price": 3510.0,
                        "status": {"enum": "Status.NOTTRADED"},
                    },
                },
            },
        })
    }

    #[test]
    fn test_end_to_end_view_model() {
        let view = transform(&sample_snapshot(), "15m");

        assert_eq!(view.timestamp, "2025-01-15 14:30:00");
        assert_eq!(view.variant, "15m");
        assert_eq!(view.instruments.len(), 1);
        assert_eq!(view.positions.len(), 1);
        assert_eq!(view.orders.len(), 1);
        assert_eq!(view.positions[0].direction, "Direction.LONG");
        assert_eq!(view.orders[0].status, "Status.NOTTRADED");
        assert_eq!(view.orders[0].offset, "Offset.CLOSE");

        // Output carries exactly the five public keys.
        let serialized = serde_json::to_value(&view).unwrap();
        let keys: Vec<&str> = serialized
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            vec!["timestamp", "variant", "instruments", "positions", "orders"]
        );
    }

    #[test]
    fn test_instrument_with_no_bars_is_skipped() {
        let view = transform(&sample_snapshot(), "15m");
        assert!(view.instruments.contains_key("rb2501.SHFE"));
        assert!(!view.instruments.contains_key("empty.SHFE"));
    }

    #[test]
    fn test_instrument_sequences_are_parallel() {
        let view = transform(&sample_snapshot(), "15m");
        let instrument = &view.instruments["rb2501.SHFE"];
        let dates = instrument["dates"].as_array().unwrap();
        let ohlc = instrument["ohlc"].as_array().unwrap();
        let volumes = instrument["volumes"].as_array().unwrap();
        assert_eq!(dates.len(), 2);
        assert_eq!(ohlc.len(), 2);
        assert_eq!(volumes.len(), 2);
        assert_eq!(dates[0], "2025-01-15 14:15:00");
        // Rows are [open, close, low, high].
        assert_eq!(ohlc[0], json!([3500.0, 3505.0, 3495.0, 3510.0]));
        assert_eq!(instrument["last_price"], json!(3508.0));
        assert_eq!(instrument["delivery_month"], json!("2501"));
        assert_eq!(instrument["status"], json!({}));
        assert_eq!(instrument["indicators"]["ma"]["fast"], json!(3506.1));
    }

    #[test]
    fn test_legacy_record_list_bars() {
        // Legacy snapshots carry bars as a plain record list instead of a
        // dataframe-tagged table; both shapes produce the same view.
        let snapshot = json!({
            "target_aggregate": {
                "instruments": {
                    "CF709.CZCE": {
                        "bars": [
                            {"datetime": {"datetime": "2017-08-01T10:00:00"},
                             "open": 15000.0, "high": 15100.0, "low": 14900.0,
                             "close": 15050.0, "volume": 320.0},
                        ],
                    },
                },
            },
        });
        let view = transform(&snapshot, "1d");
        let instrument = &view.instruments["CF709.CZCE"];
        assert_eq!(instrument["ohlc"][0], json!([15000.0, 15050.0, 14900.0, 15100.0]));
        assert_eq!(instrument["delivery_month"], json!("2709"));
    }

    #[test]
    fn test_positions_keep_insertion_order() {
        let snapshot = json!({
            "position_aggregate": {
                "positions": {
                    "zz.SHFE": {"vt_symbol": "zz.SHFE", "volume": 1.0},
                    "aa.DCE": {"vt_symbol": "aa.DCE", "volume": 2.0},
                },
            },
        });
        let view = transform(&snapshot, "x");
        let symbols: Vec<&str> = view
            .positions
            .iter()
            .map(|position| position.vt_symbol.as_str())
            .collect();
        assert_eq!(symbols, vec!["zz.SHFE", "aa.DCE"]);
    }

    #[test]
    fn test_missing_aggregates_yield_empty_view() {
        let view = transform(&json!({}), "15m");
        assert_eq!(view.timestamp, "");
        assert!(view.instruments.is_empty());
        assert!(view.positions.is_empty());
        assert!(view.orders.is_empty());
    }

    #[test]
    fn test_string_current_dt_is_reformatted() {
        let view = transform(&json!({"current_dt": "2025-01-15T14:30:00"}), "x");
        assert_eq!(view.timestamp, "2025-01-15 14:30:00");
        // Unparseable strings pass through raw.
        let view = transform(&json!({"current_dt": "soon"}), "x");
        assert_eq!(view.timestamp, "soon");
    }

    #[test]
    fn test_payload_dispatch_passthrough() {
        let stored = json!({
            "timestamp": "2025-01-15 14:30:00",
            "instruments": {},
            "positions": [],
            "orders": [],
        });
        let view = view_model_from_payload(&stored, "30m").unwrap();
        assert_eq!(view.timestamp, "2025-01-15 14:30:00");
        assert_eq!(view.variant, "30m");
    }

    #[test]
    fn test_payload_dispatch_raw_snapshot() {
        let view = view_model_from_payload(&sample_snapshot(), "15m").unwrap();
        assert_eq!(view.instruments.len(), 1);
    }

    #[test]
    fn test_payload_dispatch_rejects_non_object() {
        assert!(view_model_from_payload(&json!([1, 2, 3]), "x").is_none());
        assert!(view_model_from_payload(&json!("text"), "x").is_none());
    }
}
