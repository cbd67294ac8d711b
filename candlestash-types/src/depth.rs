use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Symbol;

/// One price level of an order book side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Limit price.
    pub price: Decimal,
    /// Resting quantity at `price`.
    pub volume: Decimal,
}

impl Level {
    /// Construct a level.
    #[must_use]
    pub const fn new(price: Decimal, volume: Decimal) -> Self {
        Self { price, volume }
    }
}

/// Point-in-time order book snapshot.
///
/// Bids are kept best (highest) first and asks best (lowest) first regardless
/// of the order the exchange sent them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthSnapshot {
    /// Trading pair.
    pub symbol: Symbol,
    /// Exchange timestamp in milliseconds, when the exchange reports one.
    pub timestamp: Option<i64>,
    /// Buy side, descending by price.
    pub bids: Vec<Level>,
    /// Sell side, ascending by price.
    pub asks: Vec<Level>,
}

impl DepthSnapshot {
    /// Build a snapshot, ordering both sides best-first.
    #[must_use]
    pub fn new(
        symbol: Symbol,
        timestamp: Option<i64>,
        mut bids: Vec<Level>,
        mut asks: Vec<Level>,
    ) -> Self {
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));
        Self {
            symbol,
            timestamp,
            bids,
            asks,
        }
    }

    /// Best bid, if any.
    #[must_use]
    pub fn best_bid(&self) -> Option<&Level> {
        self.bids.first()
    }

    /// Best ask, if any.
    #[must_use]
    pub fn best_ask(&self) -> Option<&Level> {
        self.asks.first()
    }
}
