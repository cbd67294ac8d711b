use std::path::{Path, PathBuf};

use candlestash_core::{CollectorConfig, Interval, OutputFormat, StashError, Symbol};
use clap::Parser;

/// Collect OHLCV history and order book snapshots into per-symbol files.
#[derive(Debug, Parser)]
#[command(name = "candlestash", version, about)]
pub struct Cli {
    /// JSON config file; flags below override its values.
    #[arg(long, env = "CANDLESTASH_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Trading pair such as BTC/USDT. Repeat or comma-separate for several.
    #[arg(
        long = "symbol",
        env = "CANDLESTASH_SYMBOLS",
        value_name = "BASE/QUOTE",
        value_delimiter = ','
    )]
    pub symbols: Vec<Symbol>,

    /// Candle interval such as 1h. Repeat or comma-separate for several.
    #[arg(
        long = "interval",
        env = "CANDLESTASH_INTERVALS",
        value_name = "CODE",
        value_delimiter = ','
    )]
    pub intervals: Vec<Interval>,

    /// Exchange id (binance, mock).
    #[arg(long, env = "CANDLESTASH_EXCHANGE")]
    pub exchange: Option<String>,

    /// Base output directory.
    #[arg(long, env = "CANDLESTASH_OUTPUT_DIR", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Order book levels per side.
    #[arg(long, env = "CANDLESTASH_DEPTH_LEVELS")]
    pub depth_levels: Option<u32>,

    /// Bars requested per page.
    #[arg(long, env = "CANDLESTASH_PAGE_SIZE")]
    pub page_size: Option<u32>,

    /// Artifact format: text, csv or json.
    #[arg(long, env = "CANDLESTASH_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Delay between symbols in milliseconds.
    #[arg(long, env = "CANDLESTASH_SYMBOL_DELAY_MS")]
    pub symbol_delay_ms: Option<u64>,

    /// Rate-limit retries per page before giving up.
    #[arg(long, env = "CANDLESTASH_MAX_RETRIES")]
    pub max_retries: Option<u32>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    pub dump_config: bool,
}

/// Read a JSON config file. Missing keys take their defaults.
///
/// # Errors
/// Returns `Io` if the file cannot be read, or `InvalidArg` if it is not a valid config.
pub fn load_config_file(path: &Path) -> Result<CollectorConfig, StashError> {
    let raw = std::fs::read_to_string(path).map_err(|e| StashError::io(path, &e))?;
    serde_json::from_str(&raw).map_err(|e| {
        StashError::InvalidArg(format!("config file {}: {e}", path.display()))
    })
}

impl Cli {
    /// Merge the config file (if any) with command line overrides and validate.
    ///
    /// # Errors
    /// Returns the file loading error or the first validation failure.
    pub fn into_config(self) -> Result<CollectorConfig, StashError> {
        let mut cfg = match &self.config {
            Some(path) => load_config_file(path)?,
            None => CollectorConfig::default(),
        };
        if !self.symbols.is_empty() {
            cfg.symbols = self.symbols;
        }
        if !self.intervals.is_empty() {
            cfg.intervals = self.intervals;
        }
        if let Some(exchange) = self.exchange {
            cfg.exchange_id = exchange;
        }
        if let Some(dir) = self.output_dir {
            cfg.output_dir = dir;
        }
        if let Some(levels) = self.depth_levels {
            cfg.depth_levels = levels;
        }
        if let Some(size) = self.page_size {
            cfg.page_size = size;
        }
        if let Some(format) = self.format {
            cfg.output_format = format;
        }
        if let Some(ms) = self.symbol_delay_ms {
            cfg.symbol_delay_ms = ms;
        }
        if let Some(n) = self.max_retries {
            cfg.backoff.max_retries = Some(n);
        }
        cfg.validate()?;
        Ok(cfg)
    }
}
