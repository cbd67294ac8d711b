use candlestash_core::{Bar, Decimal, Interval};

/// First candle of every fixture series: 2024-01-01T00:00:00Z.
pub const ORIGIN_MS: i64 = 1_704_067_200_000;

/// Number of candles each fixture series holds.
pub const BARS_PER_SERIES: i64 = 120;

const MONTH_MS: i64 = 30 * 86_400_000;

/// Reference price for the fixture symbols, in cents.
pub fn base_price_cents(symbol: &str) -> Option<i64> {
    match symbol {
        "BTC/USDT" => Some(4_200_000),
        "ETH/USDT" => Some(230_000),
        "TON/USDT" => Some(250),
        "SOL/USDT" => Some(10_000),
        _ => None,
    }
}

fn step_ms(interval: Interval) -> i64 {
    interval.duration_ms().unwrap_or(MONTH_MS)
}

fn candle(base: i64, interval: Interval, i: i64) -> Bar {
    // Saw-tooth drift keeps values deterministic and distinct per index
    let drift = (i % 7) - 3;
    let open = base + drift * (base / 1_000).max(1);
    let close = open + (base / 2_000).max(1) * if i % 2 == 0 { 1 } else { -1 };
    let high = open.max(close) + (base / 4_000).max(1);
    let low = open.min(close) - (base / 4_000).max(1);
    Bar {
        timestamp: ORIGIN_MS + i * step_ms(interval),
        open: Decimal::new(open, 2),
        high: Decimal::new(high, 2),
        low: Decimal::new(low, 2),
        close: Decimal::new(close, 2),
        volume: Decimal::new(1_000 + (i * 37) % 500, 3),
    }
}

/// One page of the fixture series: up to `limit` bars at or after `since`.
pub fn page(symbol: &str, interval: Interval, since: Option<i64>, limit: u32) -> Option<Vec<Bar>> {
    let base = base_price_cents(symbol)?;
    let step = step_ms(interval);
    let first = since.map_or(0, |s| {
        if s <= ORIGIN_MS {
            0
        } else {
            // Ceil division to the first candle opening at or after `since`
            (s - ORIGIN_MS).saturating_add(step - 1) / step
        }
    });
    let end = (first + i64::from(limit)).min(BARS_PER_SERIES);
    Some((first..end).map(|i| candle(base, interval, i)).collect())
}
