use core::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// High-level capability labels for errors and telemetry.
///
/// These map one-to-one with connector provider traits and allow consistent
/// Display formatting and match-exhaustive handling when adding
/// new capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Capability {
    /// Historical OHLCV bars fetched page by page.
    Ohlcv,
    /// Point-in-time order book snapshot.
    OrderBook,
}

impl Capability {
    /// Stable, kebab-case identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ohlcv => "ohlcv",
            Self::OrderBook => "order-book",
        }
    }

    /// The flag representing this capability in a [`Capabilities`] set.
    #[must_use]
    pub const fn flag(self) -> Capabilities {
        match self {
            Self::Ohlcv => Capabilities::OHLCV,
            Self::OrderBook => Capabilities::ORDER_BOOK,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Set of capabilities a connector advertises.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Capabilities: u8 {
        /// The connector can page through historical bars.
        const OHLCV = 0b0000_0001;
        /// The connector can fetch an order book snapshot.
        const ORDER_BOOK = 0b0000_0010;
    }
}

impl Capabilities {
    /// Whether the set contains the given capability.
    #[must_use]
    pub const fn has(self, cap: Capability) -> bool {
        self.contains(cap.flag())
    }
}
