use std::sync::Arc;
use std::time::Duration;

use candlestash_binance::BinanceConnector;
use candlestash_binance::adapter::DEFAULT_BASE_URL;
use candlestash_core::connector::ExchangeConnector;
use candlestash_core::{CollectorConfig, StashError};
use candlestash_mock::MockConnector;

/// Exchange ids accepted in `CollectorConfig::exchange_id`.
pub const KNOWN_EXCHANGES: &[&str] = &["binance", "mock"];

/// Resolve the configured exchange id to a connector.
///
/// Ids are matched case-insensitively.
///
/// # Errors
/// Returns `InvalidArg` for an unknown id, or the connector's construction error.
pub fn connector_for(cfg: &CollectorConfig) -> Result<Arc<dyn ExchangeConnector>, StashError> {
    match cfg.exchange_id.trim().to_ascii_lowercase().as_str() {
        "binance" => {
            let timeout = Duration::from_millis(cfg.http_timeout_ms);
            let c = BinanceConnector::with_base_url(DEFAULT_BASE_URL, timeout)?;
            Ok(Arc::new(c))
        }
        "mock" => Ok(Arc::new(MockConnector::new())),
        other => Err(StashError::InvalidArg(format!(
            "unknown exchange '{other}' (known: {})",
            KNOWN_EXCHANGES.join(", ")
        ))),
    }
}
