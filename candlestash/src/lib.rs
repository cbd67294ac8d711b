//! Candlestash collects historical candlesticks and order book snapshots from a
//! crypto exchange and writes them to per-symbol files.
//!
//! Overview
//! - Talks to exchanges through connectors implementing the `candlestash_core`
//!   contracts (`binance` over REST, `mock` for offline runs).
//! - Pages each `(symbol, interval)` forward in time from the earliest bar until
//!   the exchange returns an empty page, then de-duplicates (last seen wins) and
//!   sorts the bars.
//! - Writes one file per series and one per order book snapshot, newest bar
//!   first, as text, CSV or JSON.
//!
//! Key behaviors
//! - Strictly sequential: every request is awaited before the next, with a
//!   pacing sleep after each successful page and a delay between symbols.
//! - Rate-limited pages are retried in place with bounded exponential backoff
//!   and jitter. Any other failure stops that series only and keeps the bars
//!   already fetched.
//! - Each run wipes and recreates the symbol folders it writes to.
//! - An exchange without OHLCV aborts the run; one without order books only
//!   skips depth.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use candlestash::{Collector, CollectorConfig, registry};
//!
//! let cfg = CollectorConfig::default();
//! let collector = Collector::builder()
//!     .with_connector(registry::connector_for(&cfg)?)
//!     .config(cfg)
//!     .build()?;
//! let report = collector.run().await?;
//! println!("{} series written", report.series_written);
//! ```
#![warn(missing_docs)]

/// Command line surface of the `candlestash` binary.
#[cfg(feature = "cli")]
pub mod cli;
/// Paged series fetching, depth snapshots and retry backoff.
pub mod collect;
pub(crate) mod core;
/// Artifact naming and rendering.
pub mod output;
/// Resolution of exchange ids to connectors.
pub mod registry;
pub mod workspace;

pub use core::{Collector, CollectorBuilder};

pub use candlestash_core::{
    BackoffConfig, Bar, Capabilities, Capability, CollectorConfig, DepthSnapshot, Interval,
    Level, OutputFormat, RunReport, Series, SeriesArtifact, StashError, Symbol, SymbolReport,
};
