//! Artifact naming, rendering and atomic writes.
//!
//! Series land in `<dir>/<SYMBOL>_<interval>_ohlcv.<ext>` and depth snapshots
//! in `<dir>/<SYMBOL>_orderbook_snapshot.<ext>`, where `<SYMBOL>` is the
//! sanitized symbol and `<ext>` follows the [`OutputFormat`].

pub mod csv;
pub mod json;
pub mod text;

use std::path::{Path, PathBuf};

use candlestash_core::{DepthSnapshot, Interval, OutputFormat, Series, StashError, Symbol};

/// File name of the series artifact for `(symbol, interval)`.
#[must_use]
pub fn series_file_name(symbol: &Symbol, interval: Interval, format: OutputFormat) -> String {
    format!(
        "{}_{}_ohlcv.{}",
        symbol.sanitized(),
        interval,
        format.extension()
    )
}

/// File name of the depth artifact for `symbol`.
#[must_use]
pub fn depth_file_name(symbol: &Symbol, format: OutputFormat) -> String {
    format!(
        "{}_orderbook_snapshot.{}",
        symbol.sanitized(),
        format.extension()
    )
}

/// Render a series in `format`, newest bar first.
///
/// # Errors
/// Returns `StashError::Data` if JSON encoding fails.
pub fn render_series(series: &Series, format: OutputFormat) -> Result<String, StashError> {
    match format {
        OutputFormat::Text => Ok(text::render_series(series)),
        OutputFormat::Csv => Ok(csv::render_series(series)),
        OutputFormat::Json => json::render_series(series),
    }
}

/// Render an order book snapshot in `format`.
///
/// # Errors
/// Returns `StashError::Data` if JSON encoding fails.
pub fn render_depth(snapshot: &DepthSnapshot, format: OutputFormat) -> Result<String, StashError> {
    match format {
        OutputFormat::Text => Ok(text::render_depth(snapshot)),
        OutputFormat::Csv => Ok(csv::render_depth(snapshot)),
        OutputFormat::Json => json::render_depth(snapshot),
    }
}

/// Write `contents` to a sibling `.tmp` file, then rename it over `path`.
async fn write_atomic(path: &Path, contents: String) -> Result<(), StashError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    if let Err(e) = tokio::fs::write(&tmp, contents).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(StashError::io(&tmp, &e));
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(StashError::io(path, &e));
    }
    Ok(())
}

/// Render and write a series into `dir`, returning the final path.
///
/// # Errors
/// Returns `StashError::Io` on filesystem failure, or `Data` if rendering fails.
pub async fn write_series(
    dir: &Path,
    series: &Series,
    format: OutputFormat,
) -> Result<PathBuf, StashError> {
    let path = dir.join(series_file_name(&series.symbol, series.interval, format));
    write_atomic(&path, render_series(series, format)?).await?;
    #[cfg(feature = "tracing")]
    tracing::info!(path = %path.display(), bars = series.len(), "saved series");
    Ok(path)
}

/// Render and write an order book snapshot into `dir`, returning the final path.
///
/// # Errors
/// Returns `StashError::Io` on filesystem failure, or `Data` if rendering fails.
pub async fn write_depth(
    dir: &Path,
    snapshot: &DepthSnapshot,
    format: OutputFormat,
) -> Result<PathBuf, StashError> {
    let path = dir.join(depth_file_name(&snapshot.symbol, format));
    write_atomic(&path, render_depth(snapshot, format)?).await?;
    #[cfg(feature = "tracing")]
    tracing::info!(path = %path.display(), "saved order book snapshot");
    Ok(path)
}
