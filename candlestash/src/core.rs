use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use candlestash_core::connector::{ExchangeConnector, OhlcvProvider, OrderBookProvider};
use candlestash_core::{
    BackoffConfig, Capability, CollectorConfig, Interval, OutputFormat, RunReport,
    SeriesArtifact, StashError, Symbol, SymbolReport,
};

use crate::collect::{FetchOptions, fetch_depth, fetch_series};
use crate::output;
use crate::workspace::{ensure_base_dir, prepare_symbol_dir};

/// Sequential collector that pages OHLCV history and snapshots order books
/// for every configured symbol.
pub struct Collector {
    pub(crate) connector: Arc<dyn ExchangeConnector>,
    pub(crate) cfg: CollectorConfig,
}

/// Builder for constructing a `Collector` with custom configuration.
pub struct CollectorBuilder {
    connector: Option<Arc<dyn ExchangeConnector>>,
    cfg: CollectorConfig,
}

impl Default for CollectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectorBuilder {
    /// Create a new builder starting from [`CollectorConfig::default`].
    ///
    /// A connector must be supplied with [`Self::with_connector`] before
    /// [`Self::build`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            connector: None,
            cfg: CollectorConfig::default(),
        }
    }

    /// Set the exchange connector, replacing any previous one.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn ExchangeConnector>) -> Self {
        self.connector = Some(c);
        self
    }

    /// Replace the whole configuration.
    ///
    /// Later modifiers apply on top of it.
    #[must_use]
    pub fn config(mut self, cfg: CollectorConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Symbols to collect, in processing order.
    #[must_use]
    pub fn symbols(mut self, symbols: impl IntoIterator<Item = Symbol>) -> Self {
        self.cfg.symbols = symbols.into_iter().collect();
        self
    }

    /// Intervals fetched for every symbol, in order.
    #[must_use]
    pub fn intervals(mut self, intervals: impl IntoIterator<Item = Interval>) -> Self {
        self.cfg.intervals = intervals.into_iter().collect();
        self
    }

    /// Base directory for per-symbol folders.
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cfg.output_dir = dir.into();
        self
    }

    /// Order book levels requested per side.
    #[must_use]
    pub const fn depth_levels(mut self, levels: u32) -> Self {
        self.cfg.depth_levels = levels;
        self
    }

    /// Bars requested per page. Clamped to the connector's maximum at run time.
    #[must_use]
    pub const fn page_size(mut self, size: u32) -> Self {
        self.cfg.page_size = size;
        self
    }

    /// Override the delay after each successful page.
    ///
    /// Without it the connector's advertised spacing is used.
    #[must_use]
    pub fn pacing(mut self, pacing: Duration) -> Self {
        self.cfg.pacing_ms = Some(u64::try_from(pacing.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Rate-limit backoff policy.
    #[must_use]
    pub const fn backoff(mut self, cfg: BackoffConfig) -> Self {
        self.cfg.backoff = cfg;
        self
    }

    /// Delay between consecutive symbols.
    #[must_use]
    pub fn symbol_delay(mut self, delay: Duration) -> Self {
        self.cfg.symbol_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Artifact format.
    #[must_use]
    pub const fn output_format(mut self, format: OutputFormat) -> Self {
        self.cfg.output_format = format;
        self
    }

    /// Build the `Collector`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no connector was set or the configuration fails
    /// validation.
    pub fn build(self) -> Result<Collector, StashError> {
        let Some(connector) = self.connector else {
            return Err(StashError::InvalidArg(
                "no connector set; add one via with_connector(...)".to_string(),
            ));
        };
        self.cfg.validate()?;
        Ok(Collector {
            connector,
            cfg: self.cfg,
        })
    }
}

impl Collector {
    /// Start building a new `Collector`.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use candlestash::Collector;
    /// use candlestash_mock::MockConnector;
    ///
    /// let report = Collector::builder()
    ///     .with_connector(Arc::new(MockConnector::new()))
    ///     .symbols(["BTC/USDT".parse()?])
    ///     .intervals([candlestash::Interval::H1])
    ///     .output_dir("crypto_data")
    ///     .build()?
    ///     .run()
    ///     .await?;
    /// ```
    #[must_use]
    pub fn builder() -> CollectorBuilder {
        CollectorBuilder::new()
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &CollectorConfig {
        &self.cfg
    }

    /// Connector used for every request.
    #[must_use]
    pub fn connector(&self) -> &Arc<dyn ExchangeConnector> {
        &self.connector
    }

    /// Run one collection pass over every configured symbol.
    ///
    /// Each symbol folder is wiped and recreated, then every interval is paged
    /// and written, then one depth snapshot is written. Per-series and depth
    /// failures are recorded as warnings in the report.
    ///
    /// # Errors
    /// Returns `Unsupported` if the connector cannot serve OHLCV (nothing is
    /// touched on disk), or `Io` if a folder or file cannot be written.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "candlestash::core::run",
            skip(self),
            fields(
                exchange = self.connector.name(),
                symbols = self.cfg.symbols.len(),
                intervals = self.cfg.intervals.len(),
            ),
        )
    )]
    pub async fn run(&self) -> Result<RunReport, StashError> {
        let Some(ohlcv) = self.connector.as_ohlcv_provider() else {
            #[cfg(feature = "tracing")]
            tracing::error!(exchange = self.connector.name(), "exchange does not serve OHLCV");
            return Err(StashError::unsupported(Capability::Ohlcv.as_str()));
        };

        let mut report = RunReport::default();
        let depth = self.connector.as_order_book_provider();
        if depth.is_none() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                exchange = self.connector.name(),
                "exchange does not serve order books; skipping depth"
            );
            report
                .warnings
                .push(StashError::unsupported(Capability::OrderBook.as_str()));
        }

        let intervals = self.plan_intervals(ohlcv, &mut report);
        let opts = FetchOptions::for_connector(&self.cfg, self.connector.as_ref());
        ensure_base_dir(&self.cfg.output_dir).await?;

        let symbol_delay = Duration::from_millis(self.cfg.symbol_delay_ms);
        for (i, symbol) in self.cfg.symbols.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(symbol_delay).await;
            }
            let done = self
                .collect_symbol(ohlcv, depth, symbol, &intervals, &opts)
                .await?;
            report.push(done);
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            series = report.series_written,
            depth = report.depth_written,
            warnings = report.all_warnings().count(),
            "collection finished"
        );
        Ok(report)
    }

    /// Keep configured intervals the provider serves; warn about the rest.
    fn plan_intervals(&self, ohlcv: &dyn OhlcvProvider, report: &mut RunReport) -> Vec<Interval> {
        let supported = ohlcv.supported_intervals();
        let mut out = Vec::with_capacity(self.cfg.intervals.len());
        for &iv in &self.cfg.intervals {
            if supported.contains(&iv) {
                out.push(iv);
            } else {
                #[cfg(feature = "tracing")]
                tracing::warn!(interval = %iv, "interval not served by exchange; skipping");
                report
                    .warnings
                    .push(StashError::unsupported(format!("ohlcv interval {iv}")));
            }
        }
        out
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "candlestash::core::collect_symbol",
            skip(self, ohlcv, depth, intervals, opts),
            fields(symbol = %symbol),
        )
    )]
    async fn collect_symbol(
        &self,
        ohlcv: &dyn OhlcvProvider,
        depth: Option<&dyn OrderBookProvider>,
        symbol: &Symbol,
        intervals: &[Interval],
        opts: &FetchOptions,
    ) -> Result<SymbolReport, StashError> {
        #[cfg(feature = "tracing")]
        tracing::info!("processing symbol");
        let dir = prepare_symbol_dir(&self.cfg.output_dir, symbol).await?;
        let mut out = SymbolReport::new(symbol.clone());

        for &interval in intervals {
            let fetched = fetch_series(ohlcv, symbol, interval, opts).await;
            if let Some(w) = fetched.warning {
                out.warnings.push(w);
            }
            if fetched.series.is_empty() {
                #[cfg(feature = "tracing")]
                tracing::info!(interval = %interval, "no bars; nothing written");
                continue;
            }
            let path = output::write_series(&dir, &fetched.series, self.cfg.output_format).await?;
            out.series.push(SeriesArtifact {
                interval,
                bars: fetched.series.len(),
                path,
            });
        }

        if let Some(provider) = depth {
            let fetched = fetch_depth(provider, symbol, self.cfg.depth_levels).await;
            if let Some(w) = fetched.warning {
                out.warnings.push(w);
            }
            if let Some(snapshot) = fetched.snapshot {
                out.depth =
                    Some(output::write_depth(&dir, &snapshot, self.cfg.output_format).await?);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            series = out.series.len(),
            depth = out.depth.is_some(),
            warnings = out.warnings.len(),
            "finished symbol"
        );
        Ok(out)
    }
}
