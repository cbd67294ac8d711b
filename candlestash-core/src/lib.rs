//! candlestash-core
//!
//! Connector contracts and series utilities shared across the candlestash workspace.
//!
//! - `connector`: the `ExchangeConnector` trait and its capability provider traits.
//! - `timeseries`: normalization of paged bar data into a clean ascending series.
//!
//! Connectors are async and assume a Tokio 1.x runtime, matching the collector
//! that drives them.
#![warn(missing_docs)]

/// Connector capability traits and the primary `ExchangeConnector` interface.
pub mod connector;
/// Time-series utilities for de-duplicating and ordering bars.
pub mod timeseries;
pub mod types;

pub use connector::{ExchangeConnector, OhlcvProvider, OrderBookProvider};
pub use timeseries::{is_normalized, normalize_bars};
pub use types::*;
