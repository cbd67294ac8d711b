use std::time::Duration;

use candlestash::{Collector, Interval, StashError};
use candlestash_mock::{DynamicMockConnector, MockBehavior, MockCall, MockConnector};

use crate::helpers::{BTC, ETH, HOUR, T0, bar, collector, sym};

#[tokio::test]
async fn two_pages_then_empty_with_failing_depth() {
    let tmp = tempfile::tempdir().unwrap();
    let (mock, controller) = DynamicMockConnector::new_with_controller("e2e");
    controller
        .push_ohlcv_pages(
            sym(BTC),
            Interval::H1,
            [
                MockBehavior::Return(vec![bar(T0, 1), bar(T0 + HOUR, 2)]),
                MockBehavior::Return(vec![bar(T0 + 2 * HOUR, 3), bar(T0 + 3 * HOUR, 4)]),
                MockBehavior::Return(vec![]),
            ],
        )
        .await;
    controller
        .set_depth_behavior(
            sym(BTC),
            MockBehavior::Fail(StashError::connector("e2e", "book down")),
        )
        .await;

    let report = collector(mock, tmp.path(), &[BTC], &[Interval::H1])
        .run()
        .await
        .expect("run completes");

    assert_eq!(report.series_written, 1);
    assert_eq!(report.depth_written, 0);
    let btc = &report.symbols[0];
    assert_eq!(btc.series[0].bars, 4);
    assert!(btc.depth.is_none());
    assert!(matches!(btc.warnings.as_slice(), [StashError::Connector { .. }]));

    let dir = tmp.path().join("BTC_USDT");
    let written = std::fs::read_to_string(dir.join("BTC_USDT_1h_ohlcv.txt")).unwrap();
    let rows: Vec<&str> = written
        .lines()
        .filter(|l| l.starts_with("Timestamp:"))
        .collect();
    assert_eq!(rows.len(), 4);
    assert!(rows[0].starts_with("Timestamp: 2024-01-01T03:00:00.000Z | Open: 4"));
    assert!(rows[3].starts_with("Timestamp: 2024-01-01T00:00:00.000Z | Open: 1"));
    assert!(!dir.join("BTC_USDT_orderbook_snapshot.txt").exists());

    let since: Vec<Option<i64>> = controller
        .calls()
        .await
        .into_iter()
        .filter_map(|c| match c {
            MockCall::Ohlcv { since, .. } => Some(since),
            MockCall::OrderBook { .. } => None,
        })
        .collect();
    assert_eq!(since, vec![None, Some(T0 + HOUR + 1), Some(T0 + 3 * HOUR + 1)]);
}

#[tokio::test]
async fn failing_depth_keeps_every_interval_file() {
    let tmp = tempfile::tempdir().unwrap();
    let (mock, controller) = DynamicMockConnector::new_with_controller("e2e");
    let intervals = [Interval::H1, Interval::H4, Interval::D1];
    for iv in intervals {
        controller
            .push_ohlcv_pages(
                sym(ETH),
                iv,
                [
                    MockBehavior::Return(vec![bar(T0, 7), bar(T0 + HOUR, 8)]),
                    MockBehavior::Return(vec![]),
                ],
            )
            .await;
    }
    controller
        .set_depth_behavior(
            sym(ETH),
            MockBehavior::Fail(StashError::connector("e2e", "book down")),
        )
        .await;

    let report = collector(mock, tmp.path(), &[ETH], &intervals)
        .run()
        .await
        .expect("run completes");

    assert_eq!(report.series_written, 3);
    assert_eq!(report.depth_written, 0);
    let dir = tmp.path().join("ETH_USDT");
    for code in ["1h", "4h", "1d"] {
        assert!(
            dir.join(format!("ETH_USDT_{code}_ohlcv.txt")).is_file(),
            "missing {code} series"
        );
    }
    let names: Vec<String> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 3, "{names:?}");
    assert!(names.iter().all(|n| !n.contains("_orderbook_snapshot")));
}

#[tokio::test]
async fn static_mock_full_run_writes_every_artifact() {
    let tmp = tempfile::tempdir().unwrap();
    let c = Collector::builder()
        .with_connector(std::sync::Arc::new(MockConnector::new()))
        .symbols([sym(BTC), sym(ETH)])
        .intervals([Interval::H1, Interval::D1])
        .output_dir(tmp.path())
        .page_size(50)
        .symbol_delay(Duration::ZERO)
        .build()
        .unwrap();

    let report = c.run().await.unwrap();
    assert_eq!(report.series_written, 4);
    assert_eq!(report.depth_written, 2);
    assert_eq!(report.all_warnings().count(), 0);
    for s in &report.symbols {
        for a in &s.series {
            assert_eq!(i64::try_from(a.bars).unwrap(), candlestash_mock::BARS_PER_SERIES);
            assert!(a.path.exists());
        }
        assert!(s.depth.as_ref().is_some_and(|p| p.exists()));
    }
    assert!(tmp.path().join("ETH_USDT/ETH_USDT_1d_ohlcv.txt").exists());
}

#[tokio::test]
async fn unknown_symbol_is_a_warning_not_a_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let c = collector(
        std::sync::Arc::new(MockConnector::new()),
        tmp.path(),
        &["DOGE/USDT", BTC],
        &[Interval::H4],
    );
    let report = c.run().await.unwrap();
    let doge = &report.symbols[0];
    assert!(doge.series.is_empty());
    assert!(
        doge.warnings
            .iter()
            .all(|w| matches!(w, StashError::NotFound { .. }))
    );
    assert!(tmp.path().join("DOGE_USDT").is_dir());
    assert_eq!(report.symbols[1].series.len(), 1);
}

#[tokio::test]
async fn stale_output_is_replaced() {
    let tmp = tempfile::tempdir().unwrap();
    let stale = tmp.path().join("BTC_USDT/BTC_USDT_5m_ohlcv.txt");
    std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
    std::fs::write(&stale, "old").unwrap();

    let c = collector(
        std::sync::Arc::new(MockConnector::new()),
        tmp.path(),
        &[BTC],
        &[Interval::H1],
    );
    c.run().await.unwrap();
    assert!(!stale.exists());
    assert!(tmp.path().join("BTC_USDT/BTC_USDT_1h_ohlcv.txt").exists());
}

#[tokio::test]
async fn unwritable_output_dir_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("not_a_dir");
    std::fs::write(&file, "x").unwrap();
    let c = collector(
        std::sync::Arc::new(MockConnector::new()),
        &file,
        &[BTC],
        &[Interval::H1],
    );
    let err = c.run().await.unwrap_err();
    assert!(matches!(err, StashError::Io { .. }), "{err:?}");
}

#[tokio::test(start_paused = true)]
async fn symbols_are_spaced_by_the_configured_delay() {
    let tmp = tempfile::tempdir().unwrap();
    let (mock, controller) = DynamicMockConnector::new_with_controller("delay");
    for s in [BTC, ETH] {
        controller
            .push_ohlcv_pages(sym(s), Interval::H1, [MockBehavior::Return(vec![bar(T0, 1)])])
            .await;
    }
    let c = Collector::builder()
        .with_connector(mock)
        .symbols([sym(BTC), sym(ETH)])
        .intervals([Interval::H1])
        .output_dir(tmp.path())
        .pacing(Duration::ZERO)
        .symbol_delay(Duration::from_secs(5))
        .build()
        .unwrap();

    let start = tokio::time::Instant::now();
    let report = c.run().await.unwrap();
    assert!(start.elapsed() >= Duration::from_secs(5));
    assert_eq!(report.series_written, 2);
}
