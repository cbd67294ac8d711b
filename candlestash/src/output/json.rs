//! Pretty-printed JSON documents with decimals encoded as strings.

use candlestash_core::{Bar, DepthSnapshot, Interval, Series, StashError, Symbol};
use serde::Serialize;

#[derive(Serialize)]
struct SeriesDocument<'a> {
    symbol: &'a Symbol,
    interval: Interval,
    bars: Vec<&'a Bar>,
}

fn encode<T: Serialize>(value: &T) -> Result<String, StashError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| StashError::Data(format!("json encoding failed: {e}")))
}

/// Render a series as a JSON document, bars newest first.
///
/// # Errors
/// Returns `StashError::Data` if serialization fails.
pub fn render_series(series: &Series) -> Result<String, StashError> {
    encode(&SeriesDocument {
        symbol: &series.symbol,
        interval: series.interval,
        bars: series.newest_first().collect(),
    })
}

/// Render an order book snapshot as a JSON document.
///
/// # Errors
/// Returns `StashError::Data` if serialization fails.
pub fn render_depth(snapshot: &DepthSnapshot) -> Result<String, StashError> {
    encode(snapshot)
}
