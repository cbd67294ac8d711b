use candlestash_core::connector::OrderBookProvider;
use candlestash_core::{DepthSnapshot, StashError, Symbol};

/// Outcome of a single order book request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthFetch {
    /// The snapshot, when the request succeeded.
    pub snapshot: Option<DepthSnapshot>,
    /// Why there is no snapshot.
    pub warning: Option<StashError>,
}

/// Fetch one order book snapshot limited to `levels` per side.
///
/// Failures are soft: no retry, the error is returned as a warning.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "candlestash::collect::fetch_depth",
        skip(provider),
        fields(symbol = %symbol, levels = levels),
    )
)]
pub async fn fetch_depth(
    provider: &dyn OrderBookProvider,
    symbol: &Symbol,
    levels: u32,
) -> DepthFetch {
    match provider.fetch_order_book(symbol, levels).await {
        Ok(snapshot) => {
            #[cfg(feature = "tracing")]
            tracing::info!(
                bids = snapshot.bids.len(),
                asks = snapshot.asks.len(),
                "order book fetched"
            );
            DepthFetch {
                snapshot: Some(snapshot),
                warning: None,
            }
        }
        Err(e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %e, "order book unavailable");
            DepthFetch {
                snapshot: None,
                warning: Some(e),
            }
        }
    }
}
