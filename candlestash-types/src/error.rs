use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the candlestash workspace.
///
/// This wraps capability mismatches, argument validation errors, connector-tagged
/// failures, exchange rate limiting, and local filesystem failures.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StashError {
    /// The requested capability is not implemented by the target connector.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "ohlcv").
        capability: String,
    },

    /// Issues with the returned or expected data (missing fields, unparsable numbers).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// An individual connector returned an error.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The exchange rejected the request because of its rate limit.
    #[error("rate limited (retry_after_ms={retry_after_ms:?})")]
    RateLimited {
        /// Exchange-suggested wait before retrying, when it sent one.
        retry_after_ms: Option<u64>,
    },

    /// A rate-limited request kept failing after every configured retry.
    #[error("still rate limited after {attempts} attempts")]
    RetriesExhausted {
        /// Number of attempts made, including the first one.
        attempts: u32,
    },

    /// A resource or symbol could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of missing resource, e.g. "market for FOO/BAR".
        what: String,
    },

    /// Local filesystem failure while preparing folders or writing output.
    #[error("io error at {path}: {msg}")]
    Io {
        /// Path involved in the failing operation.
        path: String,
        /// Error message reported by the operating system.
        msg: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl StashError {
    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build an `Io` error from a path and an `std::io::Error`.
    pub fn io(path: impl AsRef<std::path::Path>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            msg: err.to_string(),
        }
    }

    /// Returns true for exchange rate-limit rejections, the only retryable class.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
