use candlestash::output::{
    csv, depth_file_name, render_depth, render_series, series_file_name, write_depth,
    write_series,
};
use candlestash::{DepthSnapshot, Interval, OutputFormat, Series, StashError};

use crate::helpers::{BTC, book, hourly, sym};

fn series(n: i64) -> Series {
    Series {
        symbol: sym(BTC),
        interval: Interval::H4,
        bars: hourly(0, n),
    }
}

#[test]
fn file_names_follow_layout() {
    let s = sym("ETH/USDT:USDT");
    assert_eq!(
        series_file_name(&s, Interval::M15, OutputFormat::Text),
        "ETH_USDT_USDT_15m_ohlcv.txt"
    );
    assert_eq!(
        series_file_name(&s, Interval::Month1, OutputFormat::Csv),
        "ETH_USDT_USDT_1M_ohlcv.csv"
    );
    assert_eq!(
        depth_file_name(&s, OutputFormat::Json),
        "ETH_USDT_USDT_orderbook_snapshot.json"
    );
}

#[test]
fn text_series_layout() {
    let out = render_series(&series(2), OutputFormat::Text).unwrap();
    let expected = "\
--- OHLCV Data for BTC/USDT - Timeframe: 4h ---
Columns: Timestamp | Open | High | Low | Close | Volume
-------------------------------------------------------
Timestamp: 2024-01-01T01:00:00.000Z | Open: 101 | High: 101 | Low: 101 | Close: 101 | Volume: 1.5
Timestamp: 2024-01-01T00:00:00.000Z | Open: 100 | High: 100 | Low: 100 | Close: 100 | Volume: 1.5
--- End of OHLCV Data ---";
    assert_eq!(out, expected);
}

#[test]
fn text_depth_layout() {
    let out = render_depth(&book(BTC), OutputFormat::Text).unwrap();
    let expected = "\
--- Order Book Snapshot for BTC/USDT ---
Note: This is a snapshot, not real-time or historical depth.
------------------------------------------
--- Bids (Buy Orders - Price | Volume) ---
Price: 99 | Volume: 1
Price: 98 | Volume: 2
------------------------------------
--- Asks (Sell Orders - Price | Volume) ---
Price: 101 | Volume: 3
Price: 102 | Volume: 4
------------------------------------
--- End of Order Book Snapshot ---";
    assert_eq!(out, expected);
}

#[test]
fn text_depth_empty_sides() {
    let empty = DepthSnapshot::new(sym(BTC), None, vec![], vec![]);
    let out = render_depth(&empty, OutputFormat::Text).unwrap();
    assert!(out.contains("No bid orders in snapshot.\n"));
    assert!(out.contains("No ask orders in snapshot.\n"));
}

#[test]
fn csv_is_newest_first_with_raw_millis() {
    let out = render_series(&series(3), OutputFormat::Csv).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], csv::SERIES_HEADER);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "1704074400000,102,102,102,102,1.5");
    assert_eq!(lines[3], "1704067200000,100,100,100,100,1.5");

    let depth = render_depth(&book(BTC), OutputFormat::Csv).unwrap();
    assert_eq!(
        depth.lines().collect::<Vec<_>>(),
        [
            csv::DEPTH_HEADER,
            "bid,99,1",
            "bid,98,2",
            "ask,101,3",
            "ask,102,4"
        ]
    );
}

#[test]
fn json_keeps_decimals_lossless() {
    let mut s = series(2);
    s.bars[0].close = "0.000000012345678901".parse().unwrap();
    let out = render_series(&s, OutputFormat::Json).unwrap();
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["symbol"], "BTC/USDT");
    assert_eq!(v["interval"], "4h");
    let bars = v["bars"].as_array().unwrap();
    assert_eq!(bars[0]["timestamp"], 1_704_070_800_000_i64);
    assert_eq!(bars[1]["close"], "0.000000012345678901");

    let depth: DepthSnapshot =
        serde_json::from_str(&render_depth(&book(BTC), OutputFormat::Json).unwrap()).unwrap();
    assert_eq!(depth, book(BTC));
}

#[tokio::test]
async fn writes_are_atomic_and_leave_no_temp_files() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_series(tmp.path(), &series(5), OutputFormat::Csv)
        .await
        .unwrap();
    assert_eq!(path, tmp.path().join("BTC_USDT_4h_ohlcv.csv"));
    let again = write_series(tmp.path(), &series(2), OutputFormat::Csv)
        .await
        .unwrap();
    assert_eq!(std::fs::read_to_string(&again).unwrap().lines().count(), 3);

    write_depth(tmp.path(), &book(BTC), OutputFormat::Text)
        .await
        .unwrap();
    let names: Vec<String> = std::fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.iter().all(|n| !n.ends_with(".tmp")));
}

#[tokio::test]
async fn failed_rename_removes_temp_file() {
    let tmp = tempfile::tempdir().unwrap();
    // A non-empty directory at the target path makes the rename fail.
    let target = tmp.path().join("BTC_USDT_4h_ohlcv.csv");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("keep"), "x").unwrap();

    let err = write_series(tmp.path(), &series(3), OutputFormat::Csv)
        .await
        .unwrap_err();
    assert!(matches!(err, StashError::Io { .. }), "got {err:?}");
    assert!(!tmp.path().join("BTC_USDT_4h_ohlcv.csv.tmp").exists());
    assert!(target.is_dir());
}
