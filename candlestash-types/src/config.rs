//! Configuration types shared by the collector, its CLI and connectors.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Interval, StashError, Symbol};

/// Serialization format of written artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Line-oriented, human and LLM readable report.
    #[default]
    Text,
    /// Comma separated values with a header row.
    Csv,
    /// Pretty-printed JSON document.
    Json,
}

impl OutputFormat {
    /// File extension used for this format, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Stable lowercase name, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl core::str::FromStr for OutputFormat {
    type Err = StashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(StashError::InvalidArg(format!(
                "unknown output format '{other}' (expected text, csv or json)"
            ))),
        }
    }
}

/// Exponential backoff applied when the exchange reports a rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// First delay in milliseconds. `None` uses twice the connector's advertised spacing.
    pub min_backoff_ms: Option<u64>,
    /// Upper bound for any single delay in milliseconds.
    pub max_backoff_ms: u64,
    /// Exponential factor applied after each rate-limited attempt (>= 1).
    pub factor: u32,
    /// Random jitter percentage [0, 100] added to each delay.
    pub jitter_percent: u8,
    /// Retries allowed per page before giving up. `None` retries forever.
    pub max_retries: Option<u32>,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min_backoff_ms: None,
            max_backoff_ms: 60_000,
            factor: 2,
            jitter_percent: 20,
            max_retries: Some(8),
        }
    }
}

impl BackoffConfig {
    /// Delay before retry number `retry` (0-based), without jitter.
    ///
    /// `base_ms` is the first delay when `min_backoff_ms` is unset. The result
    /// never exceeds `max_backoff_ms`.
    #[must_use]
    pub fn delay_ms(&self, base_ms: u64, retry: u32) -> u64 {
        let first = self.min_backoff_ms.unwrap_or(base_ms);
        let mut delay = first;
        for _ in 0..retry {
            delay = delay.saturating_mul(u64::from(self.factor.max(1)));
            if delay >= self.max_backoff_ms {
                break;
            }
        }
        delay.min(self.max_backoff_ms)
    }

    fn validate(&self) -> Result<(), StashError> {
        if self.factor == 0 {
            return Err(StashError::InvalidArg("backoff factor must be >= 1".into()));
        }
        if self.jitter_percent > 100 {
            return Err(StashError::InvalidArg(
                "backoff jitter_percent must be within 0..=100".into(),
            ));
        }
        if let Some(min) = self.min_backoff_ms
            && min > self.max_backoff_ms
        {
            return Err(StashError::InvalidArg(format!(
                "min_backoff_ms ({min}) exceeds max_backoff_ms ({})",
                self.max_backoff_ms
            )));
        }
        Ok(())
    }
}

/// Everything a collection run needs, loaded once at startup.
///
/// Deserialization fills missing fields from [`Default`], so a config file only
/// needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Trading pairs to collect, processed in order.
    pub symbols: Vec<Symbol>,
    /// Candle intervals fetched for every symbol, in order.
    pub intervals: Vec<Interval>,
    /// Exchange connector to use (e.g. `"binance"`).
    pub exchange_id: String,
    /// Base directory holding one folder per symbol.
    pub output_dir: PathBuf,
    /// Order book levels requested per side.
    pub depth_levels: u32,
    /// Bars requested per page.
    pub page_size: u32,
    /// Delay after each successful request. `None` uses the connector's spacing.
    pub pacing_ms: Option<u64>,
    /// Rate-limit backoff policy.
    pub backoff: BackoffConfig,
    /// Delay between consecutive symbols in milliseconds.
    pub symbol_delay_ms: u64,
    /// Artifact format.
    pub output_format: OutputFormat,
    /// Per-request HTTP timeout in milliseconds.
    pub http_timeout_ms: u64,
}

fn default_symbols() -> Vec<Symbol> {
    ["BTC/USDT", "ETH/USDT", "TON/USDT"]
        .into_iter()
        .filter_map(|s| Symbol::new(s).ok())
        .collect()
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            intervals: vec![
                Interval::M1,
                Interval::M5,
                Interval::M15,
                Interval::H1,
                Interval::H4,
                Interval::D1,
            ],
            exchange_id: "binance".to_string(),
            output_dir: PathBuf::from("crypto_data"),
            depth_levels: 100,
            page_size: 1000,
            pacing_ms: None,
            backoff: BackoffConfig::default(),
            symbol_delay_ms: 5_000,
            output_format: OutputFormat::Text,
            http_timeout_ms: 30_000,
        }
    }
}

impl CollectorConfig {
    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    /// Returns `StashError::InvalidArg` naming the first offending field.
    pub fn validate(&self) -> Result<(), StashError> {
        if self.symbols.is_empty() {
            return Err(StashError::InvalidArg("at least one symbol is required".into()));
        }
        if self.intervals.is_empty() {
            return Err(StashError::InvalidArg("at least one interval is required".into()));
        }
        if self.exchange_id.trim().is_empty() {
            return Err(StashError::InvalidArg("exchange_id must not be empty".into()));
        }
        if self.page_size == 0 {
            return Err(StashError::InvalidArg("page_size must be > 0".into()));
        }
        if self.depth_levels == 0 {
            return Err(StashError::InvalidArg("depth_levels must be > 0".into()));
        }
        if self.http_timeout_ms == 0 {
            return Err(StashError::InvalidArg("http_timeout_ms must be > 0".into()));
        }
        self.backoff.validate()
    }
}
