//! Retry delays for rate-limited requests.

use std::time::Duration;

use candlestash_core::BackoffConfig;
use rand::Rng;

/// Add up to `jitter_percent` of `base_ms` as random jitter.
pub fn jitter_wait(base_ms: u64, jitter_percent: u32) -> u64 {
    let jitter_range = if jitter_percent == 0 {
        1
    } else {
        std::cmp::max(1, (base_ms.saturating_mul(u64::from(jitter_percent))) / 100)
    };
    let mut rng = rand::rng();
    base_ms.saturating_add(rng.random_range(0..jitter_range))
}

/// Delay before rate-limit retry number `retry` (0-based).
///
/// An exchange-provided `retry_after_ms` acts as a floor, even above the
/// configured maximum.
pub fn retry_delay(
    cfg: &BackoffConfig,
    base: Duration,
    retry: u32,
    retry_after_ms: Option<u64>,
) -> Duration {
    let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
    let planned = jitter_wait(cfg.delay_ms(base_ms, retry), u32::from(cfg.jitter_percent));
    Duration::from_millis(planned.max(retry_after_ms.unwrap_or(0)))
}
