use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Interval, Symbol};

/// One OHLCV candlestick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    /// Candle open time, milliseconds since the Unix epoch (UTC).
    pub timestamp: i64,
    /// Opening price.
    pub open: Decimal,
    /// Highest traded price.
    pub high: Decimal,
    /// Lowest traded price.
    pub low: Decimal,
    /// Closing price.
    pub close: Decimal,
    /// Traded volume in base-asset units.
    pub volume: Decimal,
}

impl Bar {
    /// Candle open time as a UTC datetime.
    ///
    /// Returns `None` only for timestamps outside chrono's representable range.
    #[must_use]
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Bars for one `(symbol, interval)` pair.
///
/// Once normalized, timestamps are unique and strictly ascending. Presentation
/// order is produced with [`Series::newest_first`] and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    /// Trading pair the bars belong to.
    pub symbol: Symbol,
    /// Candle interval of every bar.
    pub interval: Interval,
    /// Bars in ascending timestamp order.
    pub bars: Vec<Bar>,
}

impl Series {
    /// Whether the series holds no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Iterate bars newest first.
    pub fn newest_first(&self) -> impl Iterator<Item = &Bar> + '_ {
        self.bars.iter().rev()
    }
}
