use std::time::Duration;

use candlestash_core::connector::{ExchangeConnector, OhlcvProvider};
use candlestash_core::{
    BackoffConfig, Bar, CollectorConfig, Interval, Series, StashError, Symbol, normalize_bars,
};

use super::backoff::retry_delay;

/// Knobs for one paged series download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Bars requested per page.
    pub page_size: u32,
    /// Sleep after every successful page.
    pub pacing: Duration,
    /// Rate-limit retry policy.
    pub backoff: BackoffConfig,
    /// First backoff delay when `backoff.min_backoff_ms` is unset.
    pub backoff_base: Duration,
}

impl FetchOptions {
    /// Derive options from the run configuration and the connector's advertised spacing.
    ///
    /// The page size is clamped to what the connector serves per call; the
    /// pacing defaults to the connector's spacing and the first backoff delay
    /// to twice that.
    #[must_use]
    pub fn for_connector(cfg: &CollectorConfig, connector: &dyn ExchangeConnector) -> Self {
        let spacing = connector.rate_limit();
        let page_size = connector
            .as_ohlcv_provider()
            .map_or(cfg.page_size, |p| cfg.page_size.min(p.max_page_size()))
            .max(1);
        Self {
            page_size,
            pacing: cfg.pacing_ms.map_or(spacing, Duration::from_millis),
            backoff: cfg.backoff,
            backoff_base: spacing.saturating_mul(2),
        }
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            page_size: 1000,
            pacing: Duration::ZERO,
            backoff: BackoffConfig::default(),
            backoff_base: Duration::ZERO,
        }
    }
}

/// Outcome of paging through one `(symbol, interval)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedFetch {
    /// Normalized series (unique timestamps, ascending). May be empty.
    pub series: Series,
    /// Non-empty pages received.
    pub pages: usize,
    /// Error that stopped paging early, if any. Bars fetched before it are kept.
    pub warning: Option<StashError>,
}

/// Download every bar the exchange serves for `(symbol, interval)`.
///
/// Pages are requested forward in time from the earliest available bar until
/// the exchange returns an empty page. Rate-limited calls are retried in
/// place with exponential backoff; any other failure ends the download and is
/// reported through [`PagedFetch::warning`] together with the bars gathered so
/// far.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "candlestash::collect::fetch_series",
        skip(provider, opts),
        fields(symbol = %symbol, interval = %interval, page_size = opts.page_size),
    )
)]
pub async fn fetch_series(
    provider: &dyn OhlcvProvider,
    symbol: &Symbol,
    interval: Interval,
    opts: &FetchOptions,
) -> PagedFetch {
    let mut since: Option<i64> = None;
    let mut pages: Vec<Vec<Bar>> = Vec::new();
    let mut warning = None;
    let mut retries: u32 = 0;

    loop {
        match provider
            .fetch_ohlcv(symbol, interval, since, opts.page_size)
            .await
        {
            Ok(page) => {
                retries = 0;
                tokio::time::sleep(opts.pacing).await;

                let Some(last) = page.last().map(|b| b.timestamp) else {
                    break;
                };
                let next = last.saturating_add(1);
                #[cfg(feature = "tracing")]
                tracing::info!(bars = page.len(), next_since = next, "page received");
                pages.push(page);

                if since.is_some_and(|s| next <= s) {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(since = ?since, next_since = next, "cursor did not advance");
                    warning = Some(StashError::Data(format!(
                        "{symbol} {interval}: exchange ignored the start time (cursor stuck at {next})"
                    )));
                    break;
                }
                since = Some(next);
            }
            Err(StashError::RateLimited { retry_after_ms }) => {
                if let Some(max) = opts.backoff.max_retries
                    && retries >= max
                {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(attempts = retries + 1, "giving up after repeated rate limits");
                    warning = Some(StashError::RetriesExhausted {
                        attempts: retries + 1,
                    });
                    break;
                }
                let delay = retry_delay(&opts.backoff, opts.backoff_base, retries, retry_after_ms);
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    retry = retries + 1,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "rate limited; retrying same page"
                );
                tokio::time::sleep(delay).await;
                retries += 1;
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, fetched_pages = pages.len(), "stopping early");
                warning = Some(e);
                break;
            }
        }
    }

    let pages_received = pages.len();
    let bars = normalize_bars(pages);
    PagedFetch {
        series: Series {
            symbol: symbol.clone(),
            interval,
            bars,
        },
        pages: pages_received,
        warning,
    }
}
