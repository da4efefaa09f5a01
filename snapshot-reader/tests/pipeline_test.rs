//! End-to-end pipeline tests: raw snapshot in a backend, normalized view
//! model out of the facade, through both storage backends.

use rusqlite::{params, Connection};
use serde_json::{json, Value};
use snapshot_reader::store::{EventQuery, TimeRange};
use snapshot_reader::{ReaderConfig, ReaderFacade};

fn raw_snapshot() -> Value {
    json!({
        "current_dt": {"datetime": "2025-01-15T14:30:00+08:00"},
        "target_aggregate": {
            "instruments": {
                "pp2601.DCE": {
                    "bars": {"dataframe": true, "records": [
                        {"datetime": {"datetime": "2025-01-15T14:15:00"},
                         "open": 7300.0, "high": 7320.0, "low": 7290.0,
                         "close": 7310.0, "volume": 5000.0},
                        {"datetime": {"datetime": "2025-01-15T14:30:00"},
                         "open": 7310.0, "high": 7330.0, "low": 7305.0,
                         "close": 7325.0, "volume": 4200.0},
                    ]},
                    "indicators": {"trend": {"enum": "Trend.UP"}},
                },
            },
        },
        "position_aggregate": {
            "positions": {
                "pp2601.DCE": {
                    "vt_symbol": "pp2601.DCE",
                    "direction": {"enum": "Direction.LONG"},
                    "volume": 3.0, "price": 7280.0, "pnl": 135.0,
                },
            },
            "pending_orders": {
                "gw.7": {
                    "vt_orderid": "gw.7", "vt_symbol": "pp2601.DCE",
                    "direction": {"enum": "Direction.SHORT"},
                    "offset": {"enum": "Offset.CLOSE"},
                    "volume": 1.0, "price": 7340.0,
                    "status": {"enum": "Status.NOTTRADED"},
                },
            },
        },
    })
}

fn assert_expected_view(view: &snapshot_core::ViewModel) {
    assert_eq!(view.timestamp, "2025-01-15 14:30:00");
    assert_eq!(view.variant, "15m");
    assert_eq!(view.instruments.len(), 1);
    assert_eq!(view.positions.len(), 1);
    assert_eq!(view.orders.len(), 1);

    let instrument = &view.instruments["pp2601.DCE"];
    assert_eq!(instrument["delivery_month"], json!("2601"));
    assert_eq!(instrument["last_price"], json!(7325.0));
    assert_eq!(instrument["ohlc"][1], json!([7310.0, 7325.0, 7305.0, 7330.0]));
    assert_eq!(instrument["indicators"]["trend"], json!("Trend.UP"));

    assert_eq!(view.positions[0].direction, "Direction.LONG");
    assert_eq!(view.orders[0].vt_orderid, "gw.7");
}

#[test]
fn test_file_backend_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("snapshot_15m.json"),
        raw_snapshot().to_string(),
    )
    .unwrap();

    let facade = ReaderFacade::new(ReaderConfig::new("default", dir.path(), ""));

    let listing = facade.list_strategies();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].variant, "15m");

    let view = facade.get_strategy_data("15m").unwrap();
    assert_expected_view(&view);
}

#[test]
fn test_relational_backend_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("mirror.db");
    let config = ReaderConfig::new("default", dir.path(), &db_path);
    let facade = ReaderFacade::new(config);

    // Bootstrap happens lazily on first read; seed rows afterwards.
    assert!(facade.list_strategies().is_empty());
    let conn = Connection::open(&db_path).unwrap();
    conn.execute(
        "INSERT INTO strategy_snapshot (variant, instance_id, updated_at, payload_json) \
         VALUES ('15m', 'default', '2025-01-15 14:30:05', ?1)",
        params![raw_snapshot().to_string()],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO strategy_event \
         (variant, instance_id, vt_symbol, bar_dt, event_type, event_key, created_at, payload_json) \
         VALUES ('15m', 'default', 'pp2601.DCE', '2025-01-15 14:30:00', 'signal', 'sig-1', \
                 '2025-01-15 14:30:05', '{\"side\": \"long\"}')",
        params![],
    )
    .unwrap();

    let view = facade.get_strategy_data("15m").unwrap();
    assert_expected_view(&view);

    let events = facade.get_events("15m", &EventQuery::default());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_key, "sig-1");
    assert_eq!(events[0].payload["side"], json!("long"));

    // No bar_data table exists: bars degrade to empty, never an error.
    let range = TimeRange::new("2025-01-15 00:00:00", "2025-01-16 00:00:00");
    assert!(facade.get_bars("pp2601.DCE", &range, "1m", 100).is_empty());
}
