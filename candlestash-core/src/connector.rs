use std::time::Duration;

use async_trait::async_trait;

use crate::{Bar, Capabilities, DepthSnapshot, Interval, StashError, Symbol};
pub use candlestash_types::ConnectorKey;

/// Focused role trait for connectors that serve historical candlesticks.
#[async_trait]
pub trait OhlcvProvider: Send + Sync {
    /// Fetch one page of bars.
    ///
    /// Returns up to `limit` bars whose open time is at or after `since`
    /// (milliseconds since the epoch), oldest first. `None` asks for the
    /// earliest data the exchange will serve. An empty vector means there is
    /// nothing at or after `since`.
    ///
    /// # Errors
    /// Returns `StashError::RateLimited` when the exchange throttles the call;
    /// every other failure uses a non-retryable variant.
    async fn fetch_ohlcv(
        &self,
        symbol: &Symbol,
        interval: Interval,
        since: Option<i64>,
        limit: u32,
    ) -> Result<Vec<Bar>, StashError>;

    /// Intervals this connector can serve natively.
    fn supported_intervals(&self) -> &'static [Interval] {
        Interval::ALL
    }

    /// Largest page the exchange will return in one call.
    fn max_page_size(&self) -> u32 {
        1000
    }
}

/// Focused role trait for connectors that serve order book snapshots.
#[async_trait]
pub trait OrderBookProvider: Send + Sync {
    /// Fetch the current book with up to `limit` levels per side.
    ///
    /// # Errors
    /// Returns `StashError::RateLimited` when throttled, or another variant
    /// describing the failure.
    async fn fetch_order_book(
        &self,
        symbol: &Symbol,
        limit: u32,
    ) -> Result<DepthSnapshot, StashError>;
}

/// Exchange connector with capability discovery.
///
/// A connector advertises each capability by returning a usable trait object
/// reference from the matching `as_*_provider` accessor.
pub trait ExchangeConnector: Send + Sync {
    /// A stable identifier (e.g., "binance", "mock").
    fn name(&self) -> &'static str;

    /// Canonical connector key constructed from the static name.
    fn key(&self) -> ConnectorKey {
        ConnectorKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Minimum spacing the exchange asks between consecutive requests.
    fn rate_limit(&self) -> Duration {
        Duration::from_millis(1_000)
    }

    /// Advertise OHLCV capability.
    fn as_ohlcv_provider(&self) -> Option<&dyn OhlcvProvider> {
        None
    }

    /// Advertise order book capability.
    fn as_order_book_provider(&self) -> Option<&dyn OrderBookProvider> {
        None
    }

    /// Capability set derived from the accessors above.
    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::empty();
        if self.as_ohlcv_provider().is_some() {
            caps |= Capabilities::OHLCV;
        }
        if self.as_order_book_provider().is_some() {
            caps |= Capabilities::ORDER_BOOK;
        }
        caps
    }
}
