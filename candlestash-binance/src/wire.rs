//! Binance REST payloads as they appear on the wire.

use std::fmt;

use candlestash_core::{Bar, Decimal, Level, StashError};
use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Query parameters for `GET /api/v3/klines`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KlinesQuery {
    /// Native market id, e.g. `BTCUSDT`.
    pub symbol: String,
    /// Interval code, e.g. `1h`.
    pub interval: String,
    /// Inclusive lower bound on candle open time (ms).
    #[serde(rename = "startTime", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    /// Page size, at most 1000.
    pub limit: u32,
}

/// Query parameters for `GET /api/v3/depth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepthQuery {
    /// Native market id.
    pub symbol: String,
    /// One of the depth limits Binance accepts.
    pub limit: u32,
}

/// Binance REST API error payload, e.g. `{"code": -1121, "msg": "Invalid symbol."}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    /// Binance error code (negative).
    pub code: i64,
    /// Human-readable message.
    pub msg: String,
}

/// One kline row.
///
/// Binance encodes klines as positional arrays of mixed types:
/// `[open_time, open, high, low, close, volume, close_time, ...]`. Prices
/// stay as strings here so no precision is lost before decimal parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KlineRow {
    /// Candle open time (ms).
    pub open_time: i64,
    /// Opening price.
    pub open: String,
    /// High price.
    pub high: String,
    /// Low price.
    pub low: String,
    /// Closing price.
    pub close: String,
    /// Base-asset volume.
    pub volume: String,
}

impl<'de> Deserialize<'de> for KlineRow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct KlineVisitor;

        impl<'de> Visitor<'de> for KlineVisitor {
            type Value = KlineRow;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a Binance kline array with at least 6 elements")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                fn next<'de, A, T>(seq: &mut A, field: &'static str) -> Result<T, A::Error>
                where
                    A: SeqAccess<'de>,
                    T: Deserialize<'de>,
                {
                    seq.next_element()?
                        .ok_or_else(|| de::Error::missing_field(field))
                }

                let row = KlineRow {
                    open_time: next(&mut seq, "open_time")?,
                    open: next(&mut seq, "open")?,
                    high: next(&mut seq, "high")?,
                    low: next(&mut seq, "low")?,
                    close: next(&mut seq, "close")?,
                    volume: next(&mut seq, "volume")?,
                };
                // close_time, quote volume, trade count and taker volumes are not kept
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(row)
            }
        }

        deserializer.deserialize_seq(KlineVisitor)
    }
}

fn decimal(field: &str, raw: &str) -> Result<Decimal, StashError> {
    raw.parse::<Decimal>()
        .map_err(|e| StashError::Data(format!("failed to parse {field} '{raw}': {e}")))
}

impl TryFrom<KlineRow> for Bar {
    type Error = StashError;

    fn try_from(row: KlineRow) -> Result<Self, Self::Error> {
        Ok(Self {
            timestamp: row.open_time,
            open: decimal("open", &row.open)?,
            high: decimal("high", &row.high)?,
            low: decimal("low", &row.low)?,
            close: decimal("close", &row.close)?,
            volume: decimal("volume", &row.volume)?,
        })
    }
}

/// Body of `GET /api/v3/depth`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DepthResponse {
    /// Order book update id of the snapshot.
    #[serde(rename = "lastUpdateId")]
    pub last_update_id: u64,
    /// `[price, quantity]` pairs, best first.
    pub bids: Vec<(String, String)>,
    /// `[price, quantity]` pairs, best first.
    pub asks: Vec<(String, String)>,
}

pub(crate) fn levels(side: &str, raw: Vec<(String, String)>) -> Result<Vec<Level>, StashError> {
    raw.into_iter()
        .map(|(p, q)| Ok(Level::new(decimal(side, &p)?, decimal(side, &q)?)))
        .collect()
}
