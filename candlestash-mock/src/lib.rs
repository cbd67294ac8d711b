//! Offline connectors for tests, demos and dry runs of the collector.
//!
//! - [`MockConnector`] serves deterministic fixture series and books.
//! - [`DynamicMockConnector`] defers every call to a test-held controller.
use std::time::Duration;

use async_trait::async_trait;
use candlestash_core::connector::{ExchangeConnector, OhlcvProvider, OrderBookProvider};
use candlestash_core::{Bar, DepthSnapshot, Interval, StashError, Symbol};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior, MockCall};
pub use fixtures::ohlcv::{BARS_PER_SERIES, ORIGIN_MS};

/// Mock connector for CI-safe runs. Provides deterministic data from static fixtures.
///
/// Known symbols are `BTC/USDT`, `ETH/USDT`, `TON/USDT` and `SOL/USDT`; each
/// interval holds [`BARS_PER_SERIES`] candles starting at [`ORIGIN_MS`]. The
/// base asset `FAIL` forces a connector error on every call.
pub struct MockConnector;

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Registry name of the mock exchange.
    pub const NAME: &'static str = "mock";

    /// Create the connector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn maybe_fail(symbol: &Symbol, capability: &'static str) -> Result<(), StashError> {
        if symbol.base() == "FAIL" {
            return Err(StashError::connector(
                Self::NAME,
                format!("forced failure: {capability}"),
            ));
        }
        Ok(())
    }
}

impl ExchangeConnector for MockConnector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn rate_limit(&self) -> Duration {
        Duration::ZERO
    }

    fn as_ohlcv_provider(&self) -> Option<&dyn OhlcvProvider> {
        Some(self as &dyn OhlcvProvider)
    }

    fn as_order_book_provider(&self) -> Option<&dyn OrderBookProvider> {
        Some(self as &dyn OrderBookProvider)
    }
}

#[async_trait]
impl OhlcvProvider for MockConnector {
    async fn fetch_ohlcv(
        &self,
        symbol: &Symbol,
        interval: Interval,
        since: Option<i64>,
        limit: u32,
    ) -> Result<Vec<Bar>, StashError> {
        Self::maybe_fail(symbol, "ohlcv")?;
        fixtures::ohlcv::page(symbol.as_str(), interval, since, limit)
            .ok_or_else(|| StashError::not_found(format!("market for {symbol}")))
    }
}

#[async_trait]
impl OrderBookProvider for MockConnector {
    async fn fetch_order_book(
        &self,
        symbol: &Symbol,
        limit: u32,
    ) -> Result<DepthSnapshot, StashError> {
        Self::maybe_fail(symbol, "order-book")?;
        fixtures::depth::book(symbol, limit)
            .ok_or_else(|| StashError::not_found(format!("order book for {symbol}")))
    }
}
