use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::StashError;

/// Unified trading-pair notation: `BASE/QUOTE` or `BASE/QUOTE:SETTLE`.
///
/// Parsing validates the shape once so connectors can derive their native
/// market identifiers without re-checking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    raw: String,
    slash: usize,
    colon: Option<usize>,
}

impl Symbol {
    /// Parse and validate a unified symbol such as `"BTC/USDT"`.
    ///
    /// # Errors
    /// Returns `StashError::InvalidArg` if the input is empty, contains whitespace,
    /// lacks a `/` separator, or has an empty base/quote/settle component.
    pub fn new(raw: impl Into<String>) -> Result<Self, StashError> {
        let raw = raw.into();
        if raw.is_empty() || raw.chars().any(char::is_whitespace) {
            return Err(StashError::InvalidArg(format!(
                "symbol '{raw}' must be non-empty and contain no whitespace"
            )));
        }
        let slash = raw
            .find('/')
            .ok_or_else(|| StashError::InvalidArg(format!("symbol '{raw}' must be BASE/QUOTE")))?;
        let colon = raw[slash..].find(':').map(|i| slash + i);
        let quote_end = colon.unwrap_or(raw.len());

        let base_ok = slash > 0;
        let quote_ok = quote_end > slash + 1 && !raw[slash + 1..quote_end].contains('/');
        let settle_ok = colon.is_none_or(|c| c + 1 < raw.len());
        if !(base_ok && quote_ok && settle_ok) {
            return Err(StashError::InvalidArg(format!(
                "symbol '{raw}' has an empty or malformed component"
            )));
        }

        Ok(Self { raw, slash, colon })
    }

    /// The symbol exactly as configured.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Base asset (`BTC` in `BTC/USDT`).
    #[must_use]
    pub fn base(&self) -> &str {
        &self.raw[..self.slash]
    }

    /// Quote asset (`USDT` in `BTC/USDT`).
    #[must_use]
    pub fn quote(&self) -> &str {
        let end = self.colon.unwrap_or(self.raw.len());
        &self.raw[self.slash + 1..end]
    }

    /// Settlement asset for derivatives (`USDT` in `BTC/USDT:USDT`).
    #[must_use]
    pub fn settle(&self) -> Option<&str> {
        self.colon.map(|c| &self.raw[c + 1..])
    }

    /// Filesystem-safe form: `/` and `:` replaced with `_`.
    #[must_use]
    pub fn sanitized(&self) -> String {
        self.raw.replace(['/', ':'], "_")
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Symbol {
    type Err = StashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}
