use std::collections::BTreeMap;
use std::time::Duration;

use candlestash::collect::{FetchOptions, fetch_series};
use candlestash::{Interval, StashError};
use candlestash_core::is_normalized;
use candlestash_mock::{DynamicMockConnector, MockBehavior};
use proptest::prelude::*;

use crate::helpers::{BTC, bar, no_jitter, sym};

#[derive(Clone, Debug)]
struct PageShape {
    /// How far the last bar moves past the previous page's last bar.
    advance: i64,
    /// Bars in the page, ending at its last bar; may reach back into earlier pages.
    len: i64,
    /// Rate limit the request once before serving the page.
    throttled: bool,
}

fn arb_page() -> impl Strategy<Value = PageShape> {
    (1i64..=5, 1i64..=6, any::<bool>()).prop_map(|(advance, len, throttled)| PageShape {
        advance,
        len,
        throttled,
    })
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 48, .. ProptestConfig::default() })]
    #[test]
    fn paging_collects_every_bar_once(shapes in proptest::collection::vec(arb_page(), 0..12)) {
        tokio_test::block_on(async move {
            tokio::time::pause();
            let (mock, controller) = DynamicMockConnector::new_with_controller("prop");

            let mut script = Vec::new();
            let mut expected: BTreeMap<i64, i64> = BTreeMap::new();
            let mut last = 0i64;
            for (page_no, shape) in (1i64..).zip(&shapes) {
                last += shape.advance;
                let bars: Vec<_> = (last - shape.len + 1..=last).map(|ts| bar(ts, page_no)).collect();
                for b in &bars {
                    expected.insert(b.timestamp, page_no);
                }
                if shape.throttled {
                    script.push(MockBehavior::Fail(StashError::RateLimited { retry_after_ms: None }));
                }
                script.push(MockBehavior::Return(bars));
            }
            controller.push_ohlcv_pages(sym(BTC), Interval::M1, script).await;

            let opts = FetchOptions {
                page_size: 6,
                pacing: Duration::ZERO,
                backoff: no_jitter(Some(1)),
                backoff_base: Duration::from_millis(10),
            };
            let p = mock.as_ohlcv_provider().unwrap();
            let out = fetch_series(p, &sym(BTC), Interval::M1, &opts).await;

            assert!(out.warning.is_none());
            assert_eq!(out.pages, shapes.len());
            assert!(is_normalized(&out.series.bars));
            let got: Vec<(i64, i64)> = out
                .series
                .bars
                .iter()
                .map(|b| (b.timestamp, i64::try_from(b.close.mantissa()).unwrap()))
                .collect();
            let want: Vec<(i64, i64)> = expected.into_iter().collect();
            assert_eq!(got, want);
        });
    }
}
