#[cfg(feature = "test-adapters")]
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use candlestash_core::StashError;
use reqwest::StatusCode;
use reqwest::header::RETRY_AFTER;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::wire::{ApiError, DepthQuery, DepthResponse, KlineRow, KlinesQuery};

/// Production REST endpoint for Binance spot.
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Klines abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait BinanceKlines: Send + Sync {
    /// Fetch one page of klines.
    async fn klines(&self, query: &KlinesQuery) -> Result<Vec<KlineRow>, StashError>;
}

/// Depth abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait BinanceDepth: Send + Sync {
    /// Fetch an order book snapshot.
    async fn depth(&self, query: &DepthQuery) -> Result<DepthResponse, StashError>;
}

/// Real adapter backed by a single `reqwest::Client`.
/// `reqwest::Client` is `Clone + Send + Sync`, so no external locking is needed.
#[derive(Clone)]
pub struct RealAdapter {
    http: reqwest::Client,
    base: Url,
}

impl RealAdapter {
    /// Build a client against `base_url` with a per-request timeout.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable base URL and `Other` if the HTTP
    /// client cannot be constructed (e.g. the TLS backend fails to initialize).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StashError> {
        let base = Url::parse(base_url)
            .map_err(|e| StashError::InvalidArg(format!("invalid base url '{base_url}': {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("candlestash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StashError::Other(format!("failed to build http client: {e}")))?;
        Ok(Self { http, base })
    }

    async fn get<Q, T>(&self, path: &str, query: &Q) -> Result<T, StashError>
    where
        Q: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let url = self
            .base
            .join(path)
            .map_err(|e| StashError::InvalidArg(format!("invalid path '{path}': {e}")))?;
        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| map_transport_err(&e, path))?;

        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<T>()
                .await
                .map_err(|e| StashError::Data(format!("decoding {path}: {e}")));
        }

        let retry_after_ms = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| secs.saturating_mul(1_000));
        let body = resp.text().await.unwrap_or_default();
        Err(map_status(status, retry_after_ms, &body, path))
    }
}

fn map_transport_err(e: &reqwest::Error, path: &str) -> StashError {
    if e.is_timeout() {
        StashError::connector("binance", format!("timeout: {path}"))
    } else {
        StashError::connector("binance", format!("transport error on {path}: {e}"))
    }
}

/// Map a non-success HTTP status into the workspace error type.
///
/// 429 (too many requests) and 418 (IP auto-banned after ignoring 429s) are
/// the only retryable outcomes.
pub fn map_status(
    status: StatusCode,
    retry_after_ms: Option<u64>,
    body: &str,
    context: &str,
) -> StashError {
    if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::IM_A_TEAPOT {
        return StashError::RateLimited { retry_after_ms };
    }
    match serde_json::from_str::<ApiError>(body) {
        Ok(api) => StashError::connector(
            "binance",
            format!(
                "status {} (code {}): {} [{context}]",
                status.as_u16(),
                api.code,
                api.msg
            ),
        ),
        Err(_) => StashError::connector(
            "binance",
            format!("status {}: {context}", status.as_u16()),
        ),
    }
}

#[async_trait]
impl BinanceKlines for RealAdapter {
    async fn klines(&self, query: &KlinesQuery) -> Result<Vec<KlineRow>, StashError> {
        self.get("/api/v3/klines", query).await
    }
}

#[async_trait]
impl BinanceDepth for RealAdapter {
    async fn depth(&self, query: &DepthQuery) -> Result<DepthResponse, StashError> {
        self.get("/api/v3/depth", query).await
    }
}

#[cfg(feature = "test-adapters")]
impl dyn BinanceKlines {
    /// Build a `BinanceKlines` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn BinanceKlines>
    where
        F: Send + Sync + 'static + Fn(KlinesQuery) -> Result<Vec<KlineRow>, StashError>,
    {
        struct FnKlines<F>(F);
        #[async_trait]
        impl<F> BinanceKlines for FnKlines<F>
        where
            F: Send + Sync + 'static + Fn(KlinesQuery) -> Result<Vec<KlineRow>, StashError>,
        {
            async fn klines(&self, query: &KlinesQuery) -> Result<Vec<KlineRow>, StashError> {
                (self.0)(query.clone())
            }
        }
        Arc::new(FnKlines(f))
    }
}

#[cfg(feature = "test-adapters")]
impl dyn BinanceDepth {
    /// Build a `BinanceDepth` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn BinanceDepth>
    where
        F: Send + Sync + 'static + Fn(DepthQuery) -> Result<DepthResponse, StashError>,
    {
        struct FnDepth<F>(F);
        #[async_trait]
        impl<F> BinanceDepth for FnDepth<F>
        where
            F: Send + Sync + 'static + Fn(DepthQuery) -> Result<DepthResponse, StashError>,
        {
            async fn depth(&self, query: &DepthQuery) -> Result<DepthResponse, StashError> {
                (self.0)(query.clone())
            }
        }
        Arc::new(FnDepth(f))
    }
}

/// Helper trait to split a concrete adapter into arc trait objects.
#[cfg(feature = "test-adapters")]
pub trait CloneArcAdapters {
    /// Clone as `Arc<dyn BinanceKlines>`.
    fn clone_arc_klines(&self) -> Arc<dyn BinanceKlines> {
        <dyn BinanceKlines>::from_fn(|_| Err(StashError::unsupported("ohlcv")))
    }
    /// Clone as `Arc<dyn BinanceDepth>`.
    fn clone_arc_depth(&self) -> Arc<dyn BinanceDepth> {
        <dyn BinanceDepth>::from_fn(|_| Err(StashError::unsupported("order-book")))
    }
}

#[cfg(feature = "test-adapters")]
impl CloneArcAdapters for RealAdapter {
    fn clone_arc_klines(&self) -> Arc<dyn BinanceKlines> {
        Arc::new(self.clone()) as Arc<dyn BinanceKlines>
    }
    fn clone_arc_depth(&self) -> Arc<dyn BinanceDepth> {
        Arc::new(self.clone()) as Arc<dyn BinanceDepth>
    }
}
