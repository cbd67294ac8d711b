//! candlestash-binance
//!
//! Public connector that implements `ExchangeConnector` on top of the Binance
//! spot REST API. Exposes paged klines (OHLCV) and order book snapshots.
#![warn(missing_docs)]

/// Adapter definitions and the production adapter backed by `reqwest`.
pub mod adapter;
/// Binance REST request and response payloads.
pub mod wire;

use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "test-adapters")]
use adapter::CloneArcAdapters;
use adapter::{BinanceDepth, BinanceKlines, RealAdapter};
use async_trait::async_trait;
use candlestash_core::{
    Bar, DepthSnapshot, Interval, StashError, Symbol,
    connector::{ConnectorKey, ExchangeConnector, OhlcvProvider, OrderBookProvider},
};
use wire::{DepthQuery, KlinesQuery};

#[cfg(not(feature = "test-adapters"))]
type AdapterArc = Arc<RealAdapter>;

#[cfg(feature = "test-adapters")]
type KlinesAdapter = Arc<dyn BinanceKlines>;
#[cfg(not(feature = "test-adapters"))]
type KlinesAdapter = AdapterArc;

#[cfg(feature = "test-adapters")]
type DepthAdapter = Arc<dyn BinanceDepth>;
#[cfg(not(feature = "test-adapters"))]
type DepthAdapter = AdapterArc;

/// Largest kline page Binance serves.
pub const MAX_KLINES_PER_PAGE: u32 = 1000;

/// Depth limits accepted by `GET /api/v3/depth`.
pub const DEPTH_LIMITS: &[u32] = &[5, 10, 20, 50, 100, 500, 1000, 5000];

/// Public connector type. Production users will construct with `BinanceConnector::new_default()`.
pub struct BinanceConnector {
    klines: KlinesAdapter,
    depth: DepthAdapter,
}

impl BinanceConnector {
    /// Static connector key used by the exchange registry.
    pub const KEY: ConnectorKey = ConnectorKey::new("binance");

    /// Request spacing Binance advertises for public market data.
    pub const RATE_LIMIT: Duration = Duration::from_millis(50);

    fn normalize_error(e: StashError, what: &str) -> StashError {
        match e {
            StashError::Connector { connector: _, msg } => {
                // -1121: "Invalid symbol."
                if msg.contains("code -1121") {
                    StashError::not_found(what.to_string())
                } else {
                    StashError::connector(Self::KEY.as_str(), msg)
                }
            }
            StashError::Other(msg) => StashError::connector(Self::KEY.as_str(), msg),
            other => other,
        }
    }

    /// Build against the production endpoint with a 30 s request timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new_default() -> Result<Self, StashError> {
        Self::with_base_url(adapter::DEFAULT_BASE_URL, Duration::from_secs(30))
    }

    /// Build against a custom endpoint (testnet, proxy or a local mock server).
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable URL, or an error if the HTTP
    /// client cannot be constructed.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, StashError> {
        let a = RealAdapter::new(base_url, timeout)?;
        Ok(Self::from_adapter(&a))
    }

    /// For tests/injection (requires the `test-adapters` feature).
    ///
    /// Accepts a borrowed adapter to avoid unnecessary moves.
    #[cfg(feature = "test-adapters")]
    pub fn from_adapter<A: CloneArcAdapters + 'static>(adapter: &A) -> Self {
        Self {
            klines: adapter.clone_arc_klines(),
            depth: adapter.clone_arc_depth(),
        }
    }

    #[cfg(not(feature = "test-adapters"))]
    /// Build from a concrete `RealAdapter` by cloning it into shared handles.
    pub fn from_adapter(adapter: &RealAdapter) -> Self {
        let shared = Arc::new(adapter.clone());
        Self {
            klines: Arc::clone(&shared),
            depth: shared,
        }
    }

    /// Native market id for a unified symbol: `BTC/USDT` becomes `BTCUSDT`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for settled (derivative) symbols, which the spot API does not list.
    pub fn market_id(symbol: &Symbol) -> Result<String, StashError> {
        if symbol.settle().is_some() {
            return Err(StashError::InvalidArg(format!(
                "{symbol} is a derivative; binance spot only lists BASE/QUOTE pairs"
            )));
        }
        Ok(format!("{}{}", symbol.base(), symbol.quote()).to_ascii_uppercase())
    }

    /// Smallest accepted depth limit covering `requested` levels.
    #[must_use]
    pub fn depth_limit(requested: u32) -> u32 {
        DEPTH_LIMITS
            .iter()
            .copied()
            .find(|&l| l >= requested)
            .unwrap_or(5000)
    }
}

impl ExchangeConnector for BinanceConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Binance"
    }

    fn rate_limit(&self) -> Duration {
        Self::RATE_LIMIT
    }

    fn as_ohlcv_provider(&self) -> Option<&dyn OhlcvProvider> {
        Some(self as &dyn OhlcvProvider)
    }

    fn as_order_book_provider(&self) -> Option<&dyn OrderBookProvider> {
        Some(self as &dyn OrderBookProvider)
    }
}

#[async_trait]
impl OhlcvProvider for BinanceConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "candlestash::binance::fetch_ohlcv",
            skip(self),
            fields(symbol = %symbol, interval = %interval),
        )
    )]
    async fn fetch_ohlcv(
        &self,
        symbol: &Symbol,
        interval: Interval,
        since: Option<i64>,
        limit: u32,
    ) -> Result<Vec<Bar>, StashError> {
        let query = KlinesQuery {
            symbol: Self::market_id(symbol)?,
            interval: interval.as_str().to_string(),
            // Without startTime Binance serves the newest page, not the oldest.
            start_time: Some(since.unwrap_or(0)),
            limit: limit.clamp(1, MAX_KLINES_PER_PAGE),
        };
        let rows = self
            .klines
            .klines(&query)
            .await
            .map_err(|e| Self::normalize_error(e, &format!("market {symbol}")))?;
        rows.into_iter().map(Bar::try_from).collect()
    }

    fn max_page_size(&self) -> u32 {
        MAX_KLINES_PER_PAGE
    }
}

#[async_trait]
impl OrderBookProvider for BinanceConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "candlestash::binance::fetch_order_book",
            skip(self),
            fields(symbol = %symbol),
        )
    )]
    async fn fetch_order_book(
        &self,
        symbol: &Symbol,
        limit: u32,
    ) -> Result<DepthSnapshot, StashError> {
        let query = DepthQuery {
            symbol: Self::market_id(symbol)?,
            limit: Self::depth_limit(limit),
        };
        let raw = self
            .depth
            .depth(&query)
            .await
            .map_err(|e| Self::normalize_error(e, &format!("market {symbol}")))?;

        let mut snap = DepthSnapshot::new(
            symbol.clone(),
            None,
            wire::levels("bid", raw.bids)?,
            wire::levels("ask", raw.asks)?,
        );
        let keep = usize::try_from(limit).unwrap_or(usize::MAX);
        snap.bids.truncate(keep);
        snap.asks.truncate(keep);
        Ok(snap)
    }
}
