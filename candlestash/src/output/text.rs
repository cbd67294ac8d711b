//! Line-oriented report layout meant to be pasted into notes or fed to an LLM.

use std::fmt::Write as _;

use candlestash_core::{Bar, DepthSnapshot, Level, Series};
use chrono::SecondsFormat;

const SERIES_RULE: &str = "-------------------------------------------------------";
const BOOK_RULE: &str = "------------------------------------------";
const SECTION_RULE: &str = "------------------------------------";

fn timestamp(bar: &Bar) -> String {
    bar.datetime().map_or_else(
        || bar.timestamp.to_string(),
        |dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

/// Render a series newest first.
pub fn render_series(series: &Series) -> String {
    if series.is_empty() {
        return "No OHLCV data available.".to_string();
    }
    let mut out = format!(
        "--- OHLCV Data for {} - Timeframe: {} ---\n\
         Columns: Timestamp | Open | High | Low | Close | Volume\n\
         {SERIES_RULE}\n",
        series.symbol, series.interval
    );
    let rows: Vec<String> = series
        .newest_first()
        .map(|b| {
            format!(
                "Timestamp: {} | Open: {} | High: {} | Low: {} | Close: {} | Volume: {}",
                timestamp(b),
                b.open,
                b.high,
                b.low,
                b.close,
                b.volume
            )
        })
        .collect();
    out.push_str(&rows.join("\n"));
    out.push_str("\n--- End of OHLCV Data ---");
    out
}

fn side(out: &mut String, heading: &str, empty: &str, levels: &[Level]) {
    let _ = writeln!(out, "--- {heading} ---");
    if levels.is_empty() {
        let _ = writeln!(out, "{empty}");
    }
    for l in levels {
        let _ = writeln!(out, "Price: {} | Volume: {}", l.price, l.volume);
    }
    let _ = writeln!(out, "{SECTION_RULE}");
}

/// Render an order book snapshot, bids then asks, best level first.
pub fn render_depth(snapshot: &DepthSnapshot) -> String {
    let mut out = format!(
        "--- Order Book Snapshot for {} ---\n\
         Note: This is a snapshot, not real-time or historical depth.\n\
         {BOOK_RULE}\n",
        snapshot.symbol
    );
    side(
        &mut out,
        "Bids (Buy Orders - Price | Volume)",
        "No bid orders in snapshot.",
        &snapshot.bids,
    );
    side(
        &mut out,
        "Asks (Sell Orders - Price | Volume)",
        "No ask orders in snapshot.",
        &snapshot.asks,
    );
    out.push_str("--- End of Order Book Snapshot ---");
    out
}
