use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::StashError;

/// Candlestick interval, named by the exchange-standard short code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum Interval {
    /// One minute (`1m`).
    M1,
    /// Three minutes (`3m`).
    M3,
    /// Five minutes (`5m`).
    M5,
    /// Fifteen minutes (`15m`).
    M15,
    /// Thirty minutes (`30m`).
    M30,
    /// One hour (`1h`).
    H1,
    /// Two hours (`2h`).
    H2,
    /// Four hours (`4h`).
    H4,
    /// Six hours (`6h`).
    H6,
    /// Eight hours (`8h`).
    H8,
    /// Twelve hours (`12h`).
    H12,
    /// One day (`1d`).
    D1,
    /// Three days (`3d`).
    D3,
    /// One week (`1w`).
    W1,
    /// One calendar month (`1M`).
    Month1,
}

impl Interval {
    /// Every interval, shortest first.
    pub const ALL: &'static [Self] = &[
        Self::M1,
        Self::M3,
        Self::M5,
        Self::M15,
        Self::M30,
        Self::H1,
        Self::H2,
        Self::H4,
        Self::H6,
        Self::H8,
        Self::H12,
        Self::D1,
        Self::D3,
        Self::W1,
        Self::Month1,
    ];

    /// Short code used in configuration, file names and exchange requests.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::M1 => "1m",
            Self::M3 => "3m",
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::M30 => "30m",
            Self::H1 => "1h",
            Self::H2 => "2h",
            Self::H4 => "4h",
            Self::H6 => "6h",
            Self::H8 => "8h",
            Self::H12 => "12h",
            Self::D1 => "1d",
            Self::D3 => "3d",
            Self::W1 => "1w",
            Self::Month1 => "1M",
        }
    }

    /// Fixed length in milliseconds; `None` for calendar months.
    #[must_use]
    pub const fn duration_ms(self) -> Option<i64> {
        const MIN: i64 = 60_000;
        let minutes = match self {
            Self::M1 => 1,
            Self::M3 => 3,
            Self::M5 => 5,
            Self::M15 => 15,
            Self::M30 => 30,
            Self::H1 => 60,
            Self::H2 => 120,
            Self::H4 => 240,
            Self::H6 => 360,
            Self::H8 => 480,
            Self::H12 => 720,
            Self::D1 => 1_440,
            Self::D3 => 4_320,
            Self::W1 => 10_080,
            Self::Month1 => return None,
        };
        Some(minutes * MIN)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = StashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|iv| iv.as_str() == s)
            .ok_or_else(|| StashError::InvalidArg(format!("unknown interval '{s}'")))
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Interval {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
