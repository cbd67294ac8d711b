use candlestash::{Capabilities, Interval, StashError};
use candlestash_mock::{DynamicMockConnector, MockBehavior, MockCall};

use crate::helpers::{BTC, book, collector, hourly, sym};

#[tokio::test]
async fn missing_ohlcv_aborts_before_touching_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("data");
    let (mock, controller) = DynamicMockConnector::new_with_controller("no-ohlcv");
    controller.set_capabilities(Capabilities::ORDER_BOOK);

    let err = collector(mock, &out, &[BTC], &[Interval::H1])
        .run()
        .await
        .unwrap_err();
    assert_eq!(err, StashError::unsupported("ohlcv"));
    assert!(!out.exists());
    assert!(controller.calls().await.is_empty());
}

#[tokio::test]
async fn missing_order_book_skips_depth_only() {
    let tmp = tempfile::tempdir().unwrap();
    let (mock, controller) = DynamicMockConnector::new_with_controller("no-depth");
    controller.set_capabilities(Capabilities::OHLCV);
    controller
        .push_ohlcv_pages(sym(BTC), Interval::H1, [MockBehavior::Return(hourly(0, 3))])
        .await;
    controller
        .set_depth_behavior(sym(BTC), MockBehavior::Return(book(BTC)))
        .await;

    let report = collector(mock, tmp.path(), &[BTC], &[Interval::H1])
        .run()
        .await
        .unwrap();

    assert_eq!(report.warnings, vec![StashError::unsupported("order-book")]);
    assert_eq!(report.series_written, 1);
    assert_eq!(report.depth_written, 0);
    assert!(
        !controller
            .calls()
            .await
            .iter()
            .any(|c| matches!(c, MockCall::OrderBook { .. }))
    );
    assert!(
        !tmp.path()
            .join("BTC_USDT/BTC_USDT_orderbook_snapshot.txt")
            .exists()
    );
}

#[tokio::test]
async fn depth_is_written_when_served() {
    let tmp = tempfile::tempdir().unwrap();
    let (mock, controller) = DynamicMockConnector::new_with_controller("depth");
    controller
        .set_depth_behavior(sym(BTC), MockBehavior::Return(book(BTC)))
        .await;

    let c = candlestash::Collector::builder()
        .with_connector(mock)
        .symbols([sym(BTC)])
        .intervals([Interval::H1])
        .output_dir(tmp.path())
        .depth_levels(20)
        .symbol_delay(std::time::Duration::ZERO)
        .build()
        .unwrap();
    let report = c.run().await.unwrap();

    assert_eq!(report.depth_written, 1);
    // no bars: nothing written for the series, no warning either
    assert_eq!(report.series_written, 0);
    assert_eq!(report.all_warnings().count(), 0);
    assert!(controller.calls().await.contains(&MockCall::OrderBook {
        symbol: sym(BTC),
        limit: 20,
    }));
}

#[tokio::test]
async fn builder_requires_a_connector() {
    let err = candlestash::Collector::builder().build().err().unwrap();
    assert!(matches!(err, StashError::InvalidArg(_)));
}

#[tokio::test]
async fn builder_validates_config() {
    let (mock, _c) = DynamicMockConnector::new_with_controller("cfg");
    let err = candlestash::Collector::builder()
        .with_connector(mock)
        .intervals(Vec::<Interval>::new())
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, StashError::InvalidArg(_)));
}
