use std::time::Duration;

use candlestash::collect::{FetchOptions, fetch_series};
use candlestash::{Interval, StashError};
use candlestash_mock::{DynamicMockConnector, MockBehavior, MockCall};

use crate::helpers::{BTC, HOUR, T0, hourly, no_jitter, sym};

const LIMITED: StashError = StashError::RateLimited {
    retry_after_ms: None,
};

fn opts(max_retries: Option<u32>) -> FetchOptions {
    FetchOptions {
        page_size: 2,
        pacing: Duration::ZERO,
        backoff: no_jitter(max_retries),
        backoff_base: Duration::from_millis(1_000),
    }
}

fn cursors(calls: Vec<MockCall>) -> Vec<Option<i64>> {
    calls
        .into_iter()
        .filter_map(|c| match c {
            MockCall::Ohlcv { since, .. } => Some(since),
            MockCall::OrderBook { .. } => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn rate_limited_page_is_retried_without_advancing() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("rl");
    controller
        .push_ohlcv_pages(
            sym(BTC),
            Interval::H1,
            [
                MockBehavior::Return(hourly(0, 2)),
                MockBehavior::Fail(LIMITED),
                MockBehavior::Fail(LIMITED),
                MockBehavior::Return(hourly(2, 2)),
            ],
        )
        .await;

    let p = mock.as_ohlcv_provider().unwrap();
    let start = tokio::time::Instant::now();
    let out = fetch_series(p, &sym(BTC), Interval::H1, &opts(Some(5))).await;

    // 1s then 2s of backoff
    assert!(start.elapsed() >= Duration::from_millis(3_000));
    assert!(out.warning.is_none());
    assert_eq!(out.series.len(), 4);
    let after_first = Some(T0 + HOUR + 1);
    assert_eq!(
        cursors(controller.calls().await),
        vec![
            None,
            after_first,
            after_first,
            after_first,
            Some(T0 + 3 * HOUR + 1)
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn retries_are_bounded() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("rl-max");
    controller
        .push_ohlcv_pages(
            sym(BTC),
            Interval::H1,
            [
                MockBehavior::Return(hourly(0, 2)),
                MockBehavior::Fail(LIMITED),
                MockBehavior::Fail(LIMITED),
                MockBehavior::Fail(LIMITED),
                MockBehavior::Return(hourly(2, 2)),
            ],
        )
        .await;

    let p = mock.as_ohlcv_provider().unwrap();
    let out = fetch_series(p, &sym(BTC), Interval::H1, &opts(Some(2))).await;
    assert_eq!(out.warning, Some(StashError::RetriesExhausted { attempts: 3 }));
    assert_eq!(out.series.bars, hourly(0, 2));
    assert_eq!(controller.calls().await.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn unbounded_retries_eventually_succeed() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("rl-inf");
    let mut script = vec![MockBehavior::Fail(LIMITED); 12];
    script.push(MockBehavior::Return(hourly(0, 1)));
    controller
        .push_ohlcv_pages(sym(BTC), Interval::H1, script)
        .await;

    let p = mock.as_ohlcv_provider().unwrap();
    let out = fetch_series(p, &sym(BTC), Interval::H1, &opts(None)).await;
    assert!(out.warning.is_none());
    assert_eq!(out.series.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn retry_after_hint_is_honoured() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("rl-hint");
    controller
        .push_ohlcv_pages(
            sym(BTC),
            Interval::H1,
            [
                MockBehavior::Fail(StashError::RateLimited {
                    retry_after_ms: Some(7_000),
                }),
                MockBehavior::Return(hourly(0, 1)),
            ],
        )
        .await;

    let p = mock.as_ohlcv_provider().unwrap();
    let start = tokio::time::Instant::now();
    let out = fetch_series(p, &sym(BTC), Interval::H1, &opts(Some(1))).await;
    assert!(start.elapsed() >= Duration::from_millis(7_000));
    assert_eq!(out.series.len(), 1);
}
