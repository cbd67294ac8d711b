use candlestash_core::{Decimal, DepthSnapshot, Level, Symbol};

use super::ohlcv::{ORIGIN_MS, base_price_cents};

/// Levels generated per side before `limit` is applied.
const LEVELS_PER_SIDE: i64 = 50;

pub fn book(symbol: &Symbol, limit: u32) -> Option<DepthSnapshot> {
    let mid = base_price_cents(symbol.as_str())?;
    let tick = (mid / 10_000).max(1);
    let n = LEVELS_PER_SIDE.min(i64::from(limit));
    let bids = (1..=n)
        .map(|i| Level::new(Decimal::new(mid - i * tick, 2), Decimal::new(500 + i * 10, 3)))
        .collect();
    let asks = (1..=n)
        .map(|i| Level::new(Decimal::new(mid + i * tick, 2), Decimal::new(400 + i * 15, 3)))
        .collect();
    Some(DepthSnapshot::new(symbol.clone(), Some(ORIGIN_MS), bids, asks))
}
