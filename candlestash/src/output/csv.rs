//! Plain comma separated output. Decimal values never contain commas, so no
//! quoting is needed.

use std::fmt::Write as _;

use candlestash_core::{DepthSnapshot, Series};

/// Header row of series files.
pub const SERIES_HEADER: &str = "timestamp,open,high,low,close,volume";
/// Header row of depth files.
pub const DEPTH_HEADER: &str = "side,price,volume";

/// Render a series newest first with raw millisecond timestamps.
pub fn render_series(series: &Series) -> String {
    let mut out = String::with_capacity(64 * (series.len() + 1));
    let _ = writeln!(out, "{SERIES_HEADER}");
    for b in series.newest_first() {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{}",
            b.timestamp, b.open, b.high, b.low, b.close, b.volume
        );
    }
    out
}

/// Render bids then asks, one level per row.
pub fn render_depth(snapshot: &DepthSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{DEPTH_HEADER}");
    let sides = [("bid", &snapshot.bids), ("ask", &snapshot.asks)];
    for (side, levels) in sides {
        for l in levels {
            let _ = writeln!(out, "{side},{},{}", l.price, l.volume);
        }
    }
    out
}
